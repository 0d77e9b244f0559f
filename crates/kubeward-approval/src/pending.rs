//! Pending approval bookkeeping types.

use kubeward_core::{ApprovalId, SessionId, Timestamp};
use kubeward_llm::ToolCall;
use kubeward_safety::RiskAssessment;

/// A tool call parked in the gateway, awaiting a decision.
#[derive(Debug, Clone)]
pub struct PendingApproval {
    /// Approval id, announced to the client in the event stream.
    pub id: ApprovalId,
    /// Session the call belongs to.
    pub session_id: SessionId,
    /// The call being held.
    pub tool_call: ToolCall,
    /// Why the call was held.
    pub assessment: RiskAssessment,
    /// When the wait started.
    pub created_at: Timestamp,
    /// Current state. Always [`ResolutionState::Pending`] while the entry is
    /// live; terminal states only appear in snapshots.
    pub state: ResolutionState,
}

/// Lifecycle of a held call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Waiting for a decision.
    Pending,
    /// A human approved it.
    Approved,
    /// A human rejected it (or the session was cancelled).
    Rejected,
    /// Nobody decided before the timeout.
    Expired,
}

/// Terminal outcome of one approval wait.
///
/// `Expired` carries rejected semantics: the call must not execute. It is
/// kept distinct so callers can word the feedback differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolResolution {
    /// Execute the call.
    Approved,
    /// Do not execute; a human said no.
    Rejected,
    /// Do not execute; the wait timed out.
    Expired,
}

impl ToolResolution {
    /// Whether the call may execute.
    #[must_use]
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_approved_may_execute() {
        assert!(ToolResolution::Approved.is_approved());
        assert!(!ToolResolution::Rejected.is_approved());
        assert!(!ToolResolution::Expired.is_approved());
    }
}
