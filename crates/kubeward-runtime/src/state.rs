//! Agent loop lifecycle states.

/// Where one request currently is in the loop.
///
/// Tracked for observability; the loop itself is driven by control flow, not
/// by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting on the model provider.
    AwaitingModel,
    /// Tool calls collected, not yet dispatched.
    ToolPending,
    /// A tool call is held at the approval gateway.
    AwaitingApproval,
    /// A tool call is running against the cluster.
    ExecutingTool,
    /// Streaming final assistant text.
    ProducingText,
    /// Finished cleanly.
    Done,
    /// Finished with an error (provider failure, turn limit).
    Failed,
}

impl LoopState {
    /// Whether this is a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether moving to `next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        // Failure is reachable from any live state.
        if next == Self::Failed {
            return true;
        }
        match self {
            Self::AwaitingModel => matches!(
                next,
                Self::ToolPending | Self::ProducingText | Self::Done | Self::AwaitingModel
            ),
            Self::ToolPending => matches!(next, Self::AwaitingApproval | Self::ExecutingTool),
            Self::AwaitingApproval => {
                // Rejections skip execution and go straight back to the model.
                matches!(next, Self::ExecutingTool | Self::ToolPending | Self::AwaitingModel)
            },
            Self::ExecutingTool => {
                matches!(next, Self::ToolPending | Self::AwaitingModel)
            },
            Self::ProducingText => matches!(next, Self::Done),
            Self::Done | Self::Failed => false,
        }
    }
}
