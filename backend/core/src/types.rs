use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalysisError;

/// Lifecycle status of a scanned document.
///
/// Only `Ready` documents are ever stored; the other two are transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[serde(alias = "scanning")]
    Capturing,
    Processing,
    Ready,
}

/// Closed set of document categories the analysis may assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Receipt,
    Contract,
    Note,
    Whiteboard,
    #[serde(rename = "Business Card", alias = "BusinessCard")]
    BusinessCard,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Receipt,
        Category::Contract,
        Category::Note,
        Category::Whiteboard,
        Category::BusinessCard,
        Category::Other,
    ];

    /// Label used on the wire and in the persisted blob.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Receipt => "Receipt",
            Category::Contract => "Contract",
            Category::Note => "Note",
            Category::Whiteboard => "Whiteboard",
            Category::BusinessCard => "Business Card",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Receipt" => Ok(Category::Receipt),
            "Contract" => Ok(Category::Contract),
            "Note" => Ok(Category::Note),
            "Whiteboard" => Ok(Category::Whiteboard),
            "Business Card" | "BusinessCard" => Ok(Category::BusinessCard),
            "Other" => Ok(Category::Other),
            other => Err(AnalysisError::UnknownCategory(other.to_string())),
        }
    }
}

/// Structured result of a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub title: String,
    pub category: Category,
    pub extracted_text: String,
    pub summary: String,
    /// Suggested by the model; not used downstream yet.
    pub suggested_file_name: String,
}

/// One scanned document and its derived metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Captured image as a data URL.
    pub original_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_image: Option<String>,
    pub title: String,
    pub category: Category,
    pub extracted_text: String,
    pub summary: String,
    pub status: DocumentStatus,
    /// Signature image as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl DocumentRecord {
    /// Build a ready record from a captured image and its analysis.
    ///
    /// The timestamp is kept at millisecond precision, matching what is
    /// persisted.
    pub fn from_analysis(original_image: impl Into<String>, analysis: Analysis) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now().trunc_subsecs(3),
            original_image: original_image.into(),
            processed_image: None,
            title: analysis.title,
            category: analysis.category,
            extracted_text: analysis.extracted_text,
            summary: analysis.summary,
            status: DocumentStatus::Ready,
            signature: None,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

/// Screen currently presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Dashboard,
    Capturing,
    Review,
    Settings,
}

/// Snapshot of the navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub view: View,
    /// Set only while `view` is `Review`.
    pub active: Option<Uuid>,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_via_serde(self, f)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_via_serde(self, f)
    }
}

fn display_via_serde<T: Serialize + fmt::Debug>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_else(|| format!("{:?}", value));
    write!(f, "{}", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> Analysis {
        Analysis {
            title: "Invoice #4412".into(),
            category: Category::Receipt,
            extracted_text: "ACME Corp\nTotal: 42.00".into(),
            summary: "Invoice from ACME".into(),
            suggested_file_name: "2024-05-01_acme_invoice.pdf".into(),
        }
    }

    #[test]
    fn category_parses_wire_labels() {
        assert_eq!("Business Card".parse::<Category>().unwrap(), Category::BusinessCard);
        assert_eq!("BusinessCard".parse::<Category>().unwrap(), Category::BusinessCard);
        assert_eq!("Whiteboard".parse::<Category>().unwrap(), Category::Whiteboard);
    }

    #[test]
    fn category_rejects_values_outside_the_set() {
        let err = "Invoice".parse::<Category>().unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownCategory(v) if v == "Invoice"));
        assert!("receipt".parse::<Category>().is_err());
    }

    #[test]
    fn record_from_analysis_is_ready_and_unsigned() {
        let record = DocumentRecord::from_analysis("data:image/jpeg;base64,AAAA", sample_analysis());
        assert_eq!(record.status, DocumentStatus::Ready);
        assert_eq!(record.category, Category::Receipt);
        assert_eq!(record.title, "Invoice #4412");
        assert!(!record.is_signed());
    }

    #[test]
    fn record_serializes_with_camel_case_and_millis() {
        let record = DocumentRecord::from_analysis("data:image/jpeg;base64,AAAA", Analysis {
            category: Category::BusinessCard,
            ..sample_analysis()
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["originalImage"], "data:image/jpeg;base64,AAAA");
        assert_eq!(value["extractedText"], "ACME Corp\nTotal: 42.00");
        assert_eq!(value["category"], "Business Card");
        assert_eq!(value["status"], "ready");
        assert_eq!(value["timestamp"], record.timestamp.timestamp_millis());
        assert!(value.get("signature").is_none());

        let back: DocumentRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_reads_legacy_blob_entry() {
        let json = r#"{
            "id": "6f1c9a52-7b1e-4f0e-9a53-3c2d8f1e2b10",
            "timestamp": 1714557600000,
            "originalImage": "data:image/jpeg;base64,AAAA",
            "title": "Lunch",
            "category": "Receipt",
            "extractedText": "Soup 4.50",
            "summary": "Lunch receipt",
            "status": "ready",
            "signature": "data:image/png;base64,BBBB"
        }"#;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp.timestamp_millis(), 1714557600000);
        assert!(record.is_signed());
        assert!(record.processed_image.is_none());
    }

    #[test]
    fn status_accepts_scanning_alias() {
        let status: DocumentStatus = serde_json::from_str("\"scanning\"").unwrap();
        assert_eq!(status, DocumentStatus::Capturing);
        assert_eq!(DocumentStatus::Processing.to_string(), "processing");
    }

    #[test]
    fn view_display() {
        assert_eq!(View::Dashboard.to_string(), "dashboard");
        assert_eq!(View::Review.to_string(), "review");
    }
}
