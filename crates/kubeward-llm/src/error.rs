//! LLM error types.

use thiserror::Error;

/// Result alias for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors from an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The backend could not be reached.
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// The backend rejected the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The stream broke mid-response.
    #[error("streaming error: {0}")]
    StreamingError(String),

    /// The provider call exceeded its deadline.
    #[error("provider call timed out")]
    Timeout,

    /// The response could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
