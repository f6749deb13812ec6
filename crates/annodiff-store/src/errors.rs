//! Error handling for annodiff-store
//!
//! Wraps annodiff-core `AnnoError` with store-specific helpers

use annodiff_core::errors::{AnnoError, AnnoErrorKind, AnnodiffError};

/// Result type alias using AnnoError
pub type Result<T> = std::result::Result<T, AnnoError>;

pub use annodiff_core::errors::io_error;

/// A session id that is not a UUID
pub fn invalid_session_id(raw: &str) -> AnnoError {
    AnnoError::from(AnnodiffError::InvalidInput {
        reason: format!("session id '{}' is not a UUID", raw),
    })
    .with_op("parse_session_id")
}

/// No report stored under `session_id`
pub fn report_not_found(session_id: &str) -> AnnoError {
    AnnodiffError::ReportNotFound {
        session_id: session_id.to_string(),
    }
    .into()
}

/// A stored report that no longer decodes
pub fn corrupt_report(session_id: &str, err: serde_json::Error) -> AnnoError {
    AnnoError::new(AnnoErrorKind::Serialization)
        .with_op("load_report")
        .with_message(format!("report {} cannot be decoded: {}", session_id, err))
}
