//! Document Event Logger
//!
//! One structured record per document lifecycle event, emitted through
//! `tracing` on the `document_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentEvent {
    Captured {
        document_id: Uuid,
        category: String,
        analyzer: String,
    },
    AnalysisFailed {
        analyzer: String,
        error_msg: String,
    },
    Signed {
        document_id: Uuid,
    },
    Deleted {
        document_id: Uuid,
    },
    Exported {
        document_id: Uuid,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: DocumentEvent,
}

impl EventLogEntry {
    /// Build an entry, redacting free-text fields.
    pub fn new(mut event: DocumentEvent) -> Self {
        if let DocumentEvent::AnalysisFailed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    pub fn log_event(event: DocumentEvent) {
        let entry = EventLogEntry::new(event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "document_events", event = %payload, "Document event");
    }
}
