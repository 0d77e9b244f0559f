//! Audit error types.

use thiserror::Error;

/// Result alias for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Errors from the audit subsystem.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink could not persist or read entries.
    #[error("audit sink error: {0}")]
    SinkError(String),

    /// An entry could not be serialized or deserialized.
    #[error("audit serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for AuditError {
    fn from(e: std::io::Error) -> Self {
        Self::SinkError(e.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}
