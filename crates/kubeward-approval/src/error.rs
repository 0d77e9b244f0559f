//! Approval error types.

use kubeward_core::ApprovalId;
use thiserror::Error;

/// Result alias for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;

/// Errors from the approval gateway.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// No pending approval with this id. Either it never existed or it was
    /// already resolved, expired, or cancelled.
    #[error("no pending approval: {0}")]
    NotFound(ApprovalId),
}
