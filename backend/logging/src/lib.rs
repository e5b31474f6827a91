//! Structured logging for ScanFlow.
//!
//! Handles subscriber setup (console + rolling NDJSON file), redaction of
//! keys and inline image payloads, and document lifecycle event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{DocumentEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
