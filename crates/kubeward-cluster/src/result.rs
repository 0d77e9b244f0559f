//! Tool execution results.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one dispatched tool call.
///
/// Every dispatched call yields exactly one of these, whether it executed,
/// failed, or was refused before reaching the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The tool call this answers.
    pub call_id: String,
    /// Whether the command ran successfully.
    pub success: bool,
    /// Command output, or the error / rejection reason.
    pub output: String,
    /// Wall-clock execution time. Zero for calls that never executed.
    pub duration: Duration,
}

impl ToolResult {
    /// Result for a successful execution.
    pub fn success(call_id: impl Into<String>, output: impl Into<String>, duration: Duration) -> Self {
        Self {
            call_id: call_id.into(),
            success: true,
            output: output.into(),
            duration,
        }
    }

    /// Result for a failed execution.
    pub fn failure(call_id: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            call_id: call_id.into(),
            success: false,
            output: error.into(),
            duration,
        }
    }

    /// Synthesized result for a call refused before execution (rejected,
    /// expired, or blocked by policy).
    pub fn rejected(call_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            success: false,
            output: reason.into(),
            duration: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_has_zero_duration() {
        let result = ToolResult::rejected("call_1", "Tool execution cancelled by user");
        assert!(!result.success);
        assert_eq!(result.duration, Duration::ZERO);
        assert_eq!(result.output, "Tool execution cancelled by user");
    }
}
