//! Runtime error types.

use thiserror::Error;

/// Result alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors from the agent runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Model provider failed.
    #[error("llm error: {0}")]
    Llm(#[from] kubeward_llm::LlmError),

    /// Approval gateway failed.
    #[error("approval error: {0}")]
    Approval(#[from] kubeward_approval::ApprovalError),

    /// Audit trail failed.
    #[error("audit error: {0}")]
    Audit(#[from] kubeward_audit::AuditError),

    /// Audit sink could not be set up from configuration.
    #[error("config error: {0}")]
    Config(#[from] kubeward_config::ConfigError),

    /// The model kept calling tools past the turn limit.
    #[error("agent loop exceeded {limit} turns without a final answer")]
    MaxTurnsExceeded {
        /// The configured limit.
        limit: u32,
    },
}
