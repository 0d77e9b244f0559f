//! Kubeward config - gateway configuration.
//!
//! Loaded from a TOML file. Every knob defaults to a safe, working value so
//! an empty file (or no file) yields a usable configuration.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of its valid range.
    #[error("invalid config: {0}")]
    InvalidValue(String),
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// How long a held tool call waits for a human decision before it is
    /// rejected.
    pub approval_timeout_secs: u64,
    /// Maximum model/tool round trips per submitted message.
    pub max_turns: u32,
    /// Deadline for a single provider call.
    pub provider_timeout_secs: u64,
    /// Deadline for a single cluster command.
    pub tool_timeout_secs: u64,
    /// When set, critical commands are refused outright instead of being
    /// offered for approval.
    pub strict_mode: bool,
    /// Skip the approval gate for read-only commands.
    pub auto_approve_read_only: bool,
    /// Audit trail file (JSON lines). In-memory only when unset.
    pub audit_log_path: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            approval_timeout_secs: 60,
            max_turns: 10,
            provider_timeout_secs: 120,
            tool_timeout_secs: 60,
            strict_mode: false,
            auto_approve_read_only: true,
            audit_log_path: None,
        }
    }
}

impl GatewayConfig {
    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed or validated.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero timeouts or turns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.approval_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "approval_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::InvalidValue(
                "max_turns must be non-zero".to_string(),
            ));
        }
        if self.provider_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "provider_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.tool_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "tool_timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Approval wait deadline.
    #[must_use]
    pub fn approval_timeout(&self) -> Duration {
        Duration::from_secs(self.approval_timeout_secs)
    }

    /// Provider call deadline.
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Cluster command deadline.
    #[must_use]
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.approval_timeout_secs, 60);
        assert_eq!(config.max_turns, 10);
        assert_eq!(config.provider_timeout_secs, 120);
        assert_eq!(config.tool_timeout_secs, 60);
        assert!(!config.strict_mode);
        assert!(config.auto_approve_read_only);
        assert!(config.audit_log_path.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_toml_is_defaults() {
        let config = GatewayConfig::from_toml_str("").unwrap();
        assert_eq!(config.approval_timeout_secs, 60);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = GatewayConfig::from_toml_str(
            r#"
            strict_mode = true
            approval_timeout_secs = 30
            audit_log_path = "/var/log/kubeward/audit.log"
            "#,
        )
        .unwrap();
        assert!(config.strict_mode);
        assert_eq!(config.approval_timeout_secs, 30);
        assert_eq!(
            config.audit_log_path.as_deref(),
            Some(Path::new("/var/log/kubeward/audit.log"))
        );
        // Untouched knobs keep their defaults.
        assert_eq!(config.max_turns, 10);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = GatewayConfig::from_toml_str("approval_timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = GatewayConfig::from_toml_str("max_turns = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kubeward.toml");
        std::fs::write(&path, "max_turns = 3\n").unwrap();

        let config = GatewayConfig::from_path(&path).unwrap();
        assert_eq!(config.max_turns, 3);

        let err = GatewayConfig::from_path(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
