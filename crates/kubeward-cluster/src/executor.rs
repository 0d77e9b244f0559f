//! Cluster executor trait.

use async_trait::async_trait;

use crate::error::ClusterResult;

/// Runs one cluster command and returns its output.
///
/// Implementations wrap whatever actually talks to the cluster: a kubectl
/// subprocess runner, an API client, or a test double. They should not
/// retry; the engine treats every invocation as at-most-once.
#[async_trait]
pub trait ClusterExecutor: Send + Sync {
    /// Execute a command string, returning its stdout.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClusterError`] if the command fails or the cluster
    /// cannot be reached.
    async fn execute(&self, command: &str) -> ClusterResult<String>;
}
