//! Request instruction, response schema, and response validation for
//! document analysis.

use serde::Deserialize;
use serde_json::{json, Value};

use scanflow_core::{Analysis, AnalysisError, Category};

/// Fixed instruction sent alongside every captured image.
pub const ANALYSIS_INSTRUCTION: &str = "Analyze this document scan. Perform full OCR. \
Determine the document type. Suggest a professional filename based on content like dates \
and entities. Provide a brief summary.";

/// Structured-output schema the model must follow.
pub fn response_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::label).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "category": { "type": "STRING", "enum": categories },
            "extractedText": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "suggestedFileName": { "type": "STRING" }
        },
        "required": ["title", "category", "extractedText", "summary", "suggestedFileName"]
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    title: String,
    category: String,
    extracted_text: String,
    summary: String,
    suggested_file_name: String,
}

/// Parse the model's JSON text into an [`Analysis`].
///
/// Free text, truncated JSON, missing fields, and categories outside the
/// closed set are all rejected.
pub fn parse_analysis(text: &str) -> Result<Analysis, AnalysisError> {
    let raw: RawAnalysis = serde_json::from_str(text.trim())
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
    let category: Category = raw.category.parse()?;
    Ok(Analysis {
        title: raw.title,
        category,
        extracted_text: raw.extracted_text,
        summary: raw.summary,
        suggested_file_name: raw.suggested_file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_output() {
        let text = r#"{
            "title": "Invoice #4412",
            "category": "Receipt",
            "extractedText": "ACME\nTotal 42.00",
            "summary": "ACME invoice",
            "suggestedFileName": "2024-05-01_acme_invoice"
        }"#;
        let analysis = parse_analysis(text).unwrap();
        assert_eq!(analysis.title, "Invoice #4412");
        assert_eq!(analysis.category, Category::Receipt);
        assert_eq!(analysis.suggested_file_name, "2024-05-01_acme_invoice");
    }

    #[test]
    fn accepts_business_card_label() {
        let text = r#"{"title":"J. Doe","category":"Business Card","extractedText":"",
            "summary":"","suggestedFileName":"jdoe"}"#;
        assert_eq!(parse_analysis(text).unwrap().category, Category::BusinessCard);
    }

    #[test]
    fn rejects_category_outside_the_set() {
        let text = r#"{"title":"x","category":"Invoice","extractedText":"",
            "summary":"","suggestedFileName":"x"}"#;
        assert!(matches!(
            parse_analysis(text),
            Err(AnalysisError::UnknownCategory(c)) if c == "Invoice"
        ));
    }

    #[test]
    fn rejects_free_text_and_truncated_output() {
        assert!(matches!(
            parse_analysis("This looks like a receipt from ACME."),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"title":"Invoice","category":"Rec"#),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let text = r#"{"title":"x","category":"Note","extractedText":"","summary":""}"#;
        assert!(matches!(parse_analysis(text), Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn schema_lists_every_category() {
        let schema = response_schema();
        let labels = schema["properties"]["category"]["enum"].as_array().unwrap();
        assert_eq!(labels.len(), Category::ALL.len());
        assert!(labels.contains(&json!("Business Card")));
        assert_eq!(schema["required"].as_array().unwrap().len(), 5);
    }
}
