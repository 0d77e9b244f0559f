//! Event variants.

use kubeward_core::{ApprovalId, RiskLevel, SessionId};
use kubeward_safety::CommandCategory;
use serde::{Deserialize, Serialize};

/// One event on a request's output stream.
///
/// The serialized form is tagged with a `type` field so clients can dispatch
/// without knowing the full set of variants up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// First event of every stream: which session this request runs under.
    Session {
        /// The session id, fresh or resumed.
        session_id: SessionId,
    },

    /// A tool call was dispatched and has an outcome.
    ToolExecution {
        /// Tool name.
        tool: String,
        /// The command as shown to the operator.
        command: String,
        /// Whether execution succeeded.
        success: bool,
        /// Command output, or the error / rejection reason.
        result: String,
    },

    /// A tool call is being held for a human decision.
    ApprovalRequired {
        /// Id to pass back when resolving.
        approval_id: ApprovalId,
        /// The command awaiting approval.
        command: String,
        /// Command category.
        category: CommandCategory,
        /// Assessed risk level.
        risk_level: RiskLevel,
    },

    /// A chunk of assistant text.
    Text(String),

    /// Terminal event. Nothing follows.
    End,
}

impl AgentEvent {
    /// Whether this is the terminal event.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}
