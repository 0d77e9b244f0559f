//! Cluster execution error types.

use thiserror::Error;

/// Result alias for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors from a cluster executor.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The command ran and failed (non-zero exit, API error).
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// The cluster could not be reached.
    #[error("cluster unavailable: {0}")]
    Unavailable(String),

    /// The command exceeded its deadline.
    #[error("command timed out after {0:?}")]
    Timeout(std::time::Duration),
}
