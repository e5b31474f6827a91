use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::types::{DocumentStatus, View};

/// Failure of the remote analysis call or of its structured response.
///
/// Every variant is a retryable notice from the user's point of view: the
/// capture flow returns to the dashboard and no record is created.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Transport(String),

    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("analysis provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("analysis provider returned no content")]
    EmptyResponse,

    #[error("analysis response is not well-formed: {0}")]
    MalformedResponse(String),

    #[error("analysis returned unknown category \"{0}\"")]
    UnknownCategory(String),
}

/// Errors raised by the document record store.
///
/// `NotFound`, `DuplicateId` and `NotReady` indicate a broken invariant in
/// the caller; they abort the operation but never the process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {0} not found")]
    NotFound(Uuid),

    #[error("document {0} already exists")]
    DuplicateId(Uuid),

    #[error("document {id} is {status}, only ready documents can be stored")]
    NotReady { id: Uuid, status: DocumentStatus },

    #[error("failed to persist documents: {0}")]
    Persist(String),
}

/// Rejected navigation transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("cannot {event} while in {from}")]
    InvalidTransition { from: View, event: &'static str },

    #[error("document {0} does not exist")]
    UnknownRecord(Uuid),

    #[error("an analysis is already in flight")]
    AnalysisInFlight,
}

/// Top-level error type for ScanFlow operations.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("no document is active")]
    NoActiveDocument,

    #[error("invalid image data: {0}")]
    InvalidImage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_error_names_state_and_event() {
        let err = NavigationError::InvalidTransition {
            from: View::Settings,
            event: "capture",
        };
        assert_eq!(err.to_string(), "cannot capture while in settings");
    }

    #[test]
    fn store_error_converts_into_scan_error() {
        let id = Uuid::new_v4();
        let err: ScanError = StoreError::NotFound(id).into();
        assert!(matches!(err, ScanError::Store(StoreError::NotFound(found)) if found == id));
    }
}
