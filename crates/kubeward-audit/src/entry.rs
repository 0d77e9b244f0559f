//! Audit entry types and query filters.
//!
//! Entries are immutable once written. One entry per dispatched tool call,
//! regardless of how the call ended.

use kubeward_core::{RiskLevel, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

/// A single audit record for one tool dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the dispatch completed.
    pub timestamp: Timestamp,
    /// Session the call belonged to.
    pub session_id: SessionId,
    /// Who asked for the action (user identity, or the session id when no
    /// identity is configured).
    pub actor: String,
    /// Tool name.
    pub tool: String,
    /// The command string as shown to the operator.
    pub command: String,
    /// Risk level the command was classified at.
    pub risk_level: RiskLevel,
    /// How the approval requirement was satisfied (or not).
    pub approval_outcome: ApprovalOutcome,
    /// Whether execution succeeded. False for rejected and expired calls.
    pub success: bool,
    /// Error or rejection reason, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// Whether this entry records a mutation (anything above read-only).
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        self.risk_level.is_mutation()
    }

    /// Whether this entry matches a filter.
    #[must_use]
    pub fn matches(&self, filter: &AuditFilter) -> bool {
        if filter.only_mutations && !self.is_mutation() {
            return false;
        }
        if filter.only_errors && self.success {
            return false;
        }
        true
    }
}

/// How the approval requirement for a call was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalOutcome {
    /// Approval was required but the policy auto-approved it.
    AutoApproved,
    /// A human approved the call.
    Approved,
    /// A human rejected the call, or the wait expired.
    Rejected,
    /// The call never required approval.
    NotRequired,
}

/// Query filter over the audit trail. Criteria combine with AND; the empty
/// filter matches everything.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Only entries whose risk level is Warning or above.
    #[serde(default)]
    pub only_mutations: bool,
    /// Only entries that did not succeed.
    #[serde(default)]
    pub only_errors: bool,
}

impl AuditFilter {
    /// Filter that matches every entry.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to mutations.
    #[must_use]
    pub fn mutations(mut self) -> Self {
        self.only_mutations = true;
        self
    }

    /// Restrict to failures.
    #[must_use]
    pub fn errors(mut self) -> Self {
        self.only_errors = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(risk_level: RiskLevel, success: bool) -> AuditEntry {
        AuditEntry {
            timestamp: Timestamp::now(),
            session_id: SessionId::new(),
            actor: "operator".to_string(),
            tool: "kubectl".to_string(),
            command: "kubectl get pods".to_string(),
            risk_level,
            approval_outcome: ApprovalOutcome::NotRequired,
            success,
            error: None,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = AuditFilter::all();
        assert!(entry(RiskLevel::Safe, true).matches(&filter));
        assert!(entry(RiskLevel::Critical, false).matches(&filter));
    }

    #[test]
    fn test_mutation_filter() {
        let filter = AuditFilter::all().mutations();
        assert!(!entry(RiskLevel::Safe, true).matches(&filter));
        assert!(entry(RiskLevel::Warning, true).matches(&filter));
        assert!(entry(RiskLevel::Dangerous, true).matches(&filter));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filter = AuditFilter::all().mutations().errors();
        assert!(!entry(RiskLevel::Dangerous, true).matches(&filter));
        assert!(!entry(RiskLevel::Safe, false).matches(&filter));
        assert!(entry(RiskLevel::Dangerous, false).matches(&filter));
    }

    #[test]
    fn test_entry_serde_roundtrip() {
        let e = entry(RiskLevel::Dangerous, false);
        let json = serde_json::to_string(&e).unwrap();
        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.risk_level, RiskLevel::Dangerous);
        assert!(!back.success);
    }
}
