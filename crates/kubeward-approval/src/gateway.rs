//! The approval gateway.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};

use kubeward_core::{ApprovalId, SessionId, Timestamp};
use kubeward_llm::ToolCall;
use kubeward_safety::RiskAssessment;

use crate::error::{ApprovalError, ApprovalResult};
use crate::pending::{PendingApproval, ResolutionState, ToolResolution};

struct Entry {
    info: PendingApproval,
    sender: oneshot::Sender<bool>,
}

/// Registry of tool calls waiting for a human decision.
///
/// Each held call gets a fresh [`ApprovalId`] and a one-shot channel. The
/// entry is removed on every exit path (decision, timeout, cancellation), so
/// an id can be resolved at most once.
#[derive(Clone, Default)]
pub struct ApprovalGateway {
    pending: Arc<DashMap<ApprovalId, Entry>>,
}

impl ApprovalGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a tool call and hand back a ticket to wait on.
    ///
    /// The caller should announce [`PendingTicket::id`] to the client before
    /// awaiting the decision, otherwise nobody can resolve it.
    #[must_use]
    pub fn request(
        &self,
        session_id: SessionId,
        tool_call: ToolCall,
        assessment: RiskAssessment,
    ) -> PendingTicket {
        let id = ApprovalId::new();
        let (sender, receiver) = oneshot::channel();

        let info = PendingApproval {
            id: id.clone(),
            session_id,
            tool_call,
            assessment,
            created_at: Timestamp::now(),
            state: ResolutionState::Pending,
        };
        info!(approval_id = %id, command = %info.tool_call.command(), "Holding tool call for approval");
        self.pending.insert(id.clone(), Entry { info, sender });

        PendingTicket {
            id,
            receiver,
            gateway: self.clone(),
        }
    }

    /// Deliver a decision for a pending approval.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] when the id is unknown or was
    /// already resolved, expired, or cancelled. Duplicate decisions are
    /// therefore harmless.
    pub fn resolve(&self, id: &ApprovalId, approved: bool) -> ApprovalResult<()> {
        let (_, entry) = self
            .pending
            .remove(id)
            .ok_or_else(|| ApprovalError::NotFound(id.clone()))?;

        info!(approval_id = %id, approved, "Approval resolved");
        // The waiter may have just timed out and dropped its receiver; the
        // entry is gone either way.
        if entry.sender.send(approved).is_err() {
            debug!(approval_id = %id, "Decision arrived after the waiter gave up");
        }
        Ok(())
    }

    /// Reject and remove every pending approval belonging to a session.
    ///
    /// Used on cancellation so no waiter is left hanging.
    pub fn cancel_session(&self, session_id: &SessionId) {
        let ids: Vec<ApprovalId> = self
            .pending
            .iter()
            .filter(|e| &e.value().info.session_id == session_id)
            .map(|e| e.key().clone())
            .collect();

        for id in ids {
            if let Some((_, entry)) = self.pending.remove(&id) {
                info!(approval_id = %id, session_id = %session_id, "Rejecting approval on session cancel");
                let _ = entry.sender.send(false);
            }
        }
    }

    /// Snapshot of all live pending approvals.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingApproval> {
        self.pending.iter().map(|e| e.value().info.clone()).collect()
    }

    /// Number of calls currently held.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn remove(&self, id: &ApprovalId) {
        self.pending.remove(id);
    }
}

impl std::fmt::Debug for ApprovalGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalGateway")
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// The waiting side of one held call.
pub struct PendingTicket {
    id: ApprovalId,
    receiver: oneshot::Receiver<bool>,
    gateway: ApprovalGateway,
}

impl PendingTicket {
    /// The approval id to announce to the client.
    #[must_use]
    pub fn id(&self) -> &ApprovalId {
        &self.id
    }

    /// Wait for a decision, bounded by `timeout`.
    ///
    /// Fails closed: a timeout yields [`ToolResolution::Expired`], which
    /// callers must treat as a rejection. The gateway entry is removed on
    /// every path.
    pub async fn decide(self, timeout: Duration) -> ToolResolution {
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(true)) => ToolResolution::Approved,
            Ok(Ok(false)) => ToolResolution::Rejected,
            // Sender dropped without a decision: the entry is already gone.
            Ok(Err(_)) => ToolResolution::Rejected,
            Err(_) => {
                info!(approval_id = %self.id, "Approval wait expired, rejecting");
                self.gateway.remove(&self.id);
                ToolResolution::Expired
            },
        }
    }
}
