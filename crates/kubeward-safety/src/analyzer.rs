//! Advisory deep-analysis seam.
//!
//! A [`SafetyAnalyzer`] is an external collaborator reachable over a
//! request/response call (a remote model, a policy service). Its verdict is
//! advisory only: [`assess_with_analyzer`] merges it into the local result,
//! and any failure leaves the local result untouched.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::assessment::RiskAssessment;

/// Errors from the advisory analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The analyzer endpoint could not be reached.
    #[error("analyzer unreachable: {0}")]
    Unreachable(String),

    /// The analyzer returned an unusable response.
    #[error("invalid analyzer response: {0}")]
    InvalidResponse(String),

    /// The call exceeded its deadline.
    #[error("analyzer call timed out")]
    Timeout,
}

/// External deep analyzer for proposed commands.
#[async_trait]
pub trait SafetyAnalyzer: Send + Sync {
    /// Analyze a command in the context of a namespace.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalyzerError`] if the analyzer cannot produce a verdict.
    /// Callers must treat any error as "no opinion".
    async fn analyze(
        &self,
        command: &str,
        namespace: Option<&str>,
    ) -> Result<RiskAssessment, AnalyzerError>;
}

/// Merge an advisory verdict into the local assessment.
///
/// The deep analysis can raise the risk level and contribute warnings, but it
/// can never lower the local level, clear the approval requirement, or make a
/// refused command allowed. If the call errors or exceeds `timeout`, the
/// local result is returned unchanged (fail-open).
pub async fn assess_with_analyzer(
    local: RiskAssessment,
    analyzer: &dyn SafetyAnalyzer,
    command: &str,
    namespace: Option<&str>,
    timeout: Duration,
) -> RiskAssessment {
    let verdict = tokio::time::timeout(timeout, analyzer.analyze(command, namespace)).await;

    match verdict {
        Ok(Ok(deep)) => {
            let mut merged = local;
            merged.escalate_to(deep.level);
            merged.requires_approval = merged.requires_approval || deep.requires_approval;
            merged.allowed = merged.allowed && deep.allowed;
            for warning in deep.warnings {
                if !merged.warnings.contains(&warning) {
                    merged.warnings.push(warning);
                }
            }
            merged
        },
        Ok(Err(e)) => {
            warn!(error = %e, "Advisory analyzer failed, keeping local assessment");
            local
        },
        Err(_) => {
            warn!("Advisory analyzer timed out, keeping local assessment");
            local
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RiskClassifier;
    use kubeward_core::RiskLevel;

    struct FailingAnalyzer;

    #[async_trait]
    impl SafetyAnalyzer for FailingAnalyzer {
        async fn analyze(
            &self,
            _command: &str,
            _namespace: Option<&str>,
        ) -> Result<RiskAssessment, AnalyzerError> {
            Err(AnalyzerError::Unreachable("connection refused".to_string()))
        }
    }

    struct EscalatingAnalyzer;

    #[async_trait]
    impl SafetyAnalyzer for EscalatingAnalyzer {
        async fn analyze(
            &self,
            _command: &str,
            _namespace: Option<&str>,
        ) -> Result<RiskAssessment, AnalyzerError> {
            let mut assessment = RiskAssessment::safe();
            assessment.level = RiskLevel::Dangerous;
            assessment.requires_approval = true;
            assessment.push_warning("resource has live traffic");
            Ok(assessment)
        }
    }

    struct DowngradingAnalyzer;

    #[async_trait]
    impl SafetyAnalyzer for DowngradingAnalyzer {
        async fn analyze(
            &self,
            _command: &str,
            _namespace: Option<&str>,
        ) -> Result<RiskAssessment, AnalyzerError> {
            // Claims everything is fine.
            Ok(RiskAssessment::safe())
        }
    }

    struct SlowAnalyzer;

    #[async_trait]
    impl SafetyAnalyzer for SlowAnalyzer {
        async fn analyze(
            &self,
            _command: &str,
            _namespace: Option<&str>,
        ) -> Result<RiskAssessment, AnalyzerError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(RiskAssessment::safe())
        }
    }

    fn local(command: &str) -> RiskAssessment {
        RiskClassifier::new().classify(command, None)
    }

    #[tokio::test]
    async fn test_failing_analyzer_keeps_local_result() {
        let before = local("kubectl delete statefulset db");
        let after = assess_with_analyzer(
            before.clone(),
            &FailingAnalyzer,
            "kubectl delete statefulset db",
            None,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(after.level, before.level);
        assert_eq!(after.requires_approval, before.requires_approval);
        assert_eq!(after.warnings, before.warnings);
    }

    #[tokio::test]
    async fn test_analyzer_can_escalate() {
        let before = local("kubectl get pods");
        let after = assess_with_analyzer(
            before,
            &EscalatingAnalyzer,
            "kubectl get pods",
            None,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(after.level, RiskLevel::Dangerous);
        assert!(after.requires_approval);
        assert!(after.warnings.iter().any(|w| w.contains("live traffic")));
    }

    #[tokio::test]
    async fn test_analyzer_cannot_downgrade() {
        let before = local("kubectl delete namespace staging");
        let after = assess_with_analyzer(
            before,
            &DowngradingAnalyzer,
            "kubectl delete namespace staging",
            None,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(after.level, RiskLevel::Critical);
        assert!(after.requires_approval);
    }

    #[tokio::test]
    async fn test_slow_analyzer_times_out_fail_open() {
        let before = local("kubectl delete pod web");
        let after = assess_with_analyzer(
            before.clone(),
            &SlowAnalyzer,
            "kubectl delete pod web",
            None,
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(after.level, before.level);
    }
}
