//! Risk assessment result types.

use kubeward_core::RiskLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Command category, matching the audit trail's view of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandCategory {
    /// Only reads cluster state.
    ReadOnly,
    /// Creates or modifies resources.
    Write,
    /// Deletes resources.
    Delete,
    /// Cluster administration (nodes, RBAC, namespaces).
    Admin,
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::Write => write!(f, "write"),
            Self::Delete => write!(f, "delete"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Scope of the resources a command can affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectedScope {
    /// A single pod or similar leaf resource.
    Pod,
    /// Everything inside one namespace.
    Namespace,
    /// The whole cluster.
    Cluster,
}

impl fmt::Display for AffectedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pod => write!(f, "pod"),
            Self::Namespace => write!(f, "namespace"),
            Self::Cluster => write!(f, "cluster"),
        }
    }
}

/// Assessment of the risk posed by a proposed cluster command.
///
/// Produced fresh for every tool call; never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// The assessed risk level.
    pub level: RiskLevel,
    /// Human-readable explanation of why this level was assigned.
    pub reason: String,
    /// Whether human confirmation is needed before execution.
    pub requires_approval: bool,
    /// Whether the command may proceed at all. `false` only for critical
    /// operations under strict mode: the command is refused, not gated.
    pub allowed: bool,
    /// Command category.
    pub category: CommandCategory,
    /// Scope of impact.
    pub scope: AffectedScope,
    /// Warning messages accumulated during classification.
    pub warnings: Vec<String>,
    /// Suggested precautions, keyed to the risk level.
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    /// The default assessment: safe, read-only, no approval needed.
    #[must_use]
    pub fn safe() -> Self {
        Self {
            level: RiskLevel::Safe,
            reason: "This is a read-only operation that does not modify the cluster".to_string(),
            requires_approval: false,
            allowed: true,
            category: CommandCategory::ReadOnly,
            scope: AffectedScope::Pod,
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Add a warning message.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Raise the level if `level` is higher than the current one.
    pub fn escalate_to(&mut self, level: RiskLevel) {
        if level > self.level {
            self.level = level;
        }
    }
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.reason)
    }
}
