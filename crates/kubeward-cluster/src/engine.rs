//! Tool execution engine.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use kubeward_llm::ToolCall;

use crate::error::ClusterError;
use crate::executor::ClusterExecutor;
use crate::result::ToolResult;

/// Drives a [`ClusterExecutor`] and normalizes its outcomes.
///
/// Executor errors become non-success [`ToolResult`]s rather than propagated
/// errors: by the time a call reaches the engine it has already been
/// classified and approved, and its outcome must always flow back to the
/// model and the audit trail.
#[derive(Clone)]
pub struct ExecutionEngine {
    executor: Arc<dyn ClusterExecutor>,
    timeout: Duration,
}

impl ExecutionEngine {
    /// Create an engine with a per-call timeout.
    pub fn new(executor: Arc<dyn ClusterExecutor>, timeout: Duration) -> Self {
        Self { executor, timeout }
    }

    /// Execute one approved tool call. Never retries.
    pub async fn run(&self, call: &ToolCall) -> ToolResult {
        let command = call.command();
        let started = Instant::now();

        let outcome = tokio::time::timeout(self.timeout, self.executor.execute(&command)).await;
        let duration = started.elapsed();

        match outcome {
            Ok(Ok(output)) => {
                info!(command = %command, ?duration, "Tool call executed");
                ToolResult::success(&call.id, output, duration)
            },
            Ok(Err(e)) => {
                warn!(command = %command, error = %e, "Tool call failed");
                ToolResult::failure(&call.id, e.to_string(), duration)
            },
            Err(_) => {
                let e = ClusterError::Timeout(self.timeout);
                warn!(command = %command, error = %e, "Tool call timed out");
                ToolResult::failure(&call.id, e.to_string(), duration)
            },
        }
    }
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
