//! Local pattern classifier.
//!
//! Deterministic substring tiers, applied in order: read-only short-circuit,
//! critical, dangerous, warning. First match per tier wins. Namespace
//! heuristics (sensitive system namespaces, production-looking names) are
//! applied after the tiers and can only raise the result.

use kubeward_core::RiskLevel;
use tracing::debug;

use crate::assessment::{AffectedScope, CommandCategory, RiskAssessment};

/// Critical operations: blast radius beyond a single resource, or bypassing
/// graceful lifecycle.
const CRITICAL_PATTERNS: &[(&str, &str, AffectedScope)] = &[
    (
        "delete namespace",
        "Deleting a namespace removes ALL resources within it permanently",
        AffectedScope::Namespace,
    ),
    (
        "delete ns ",
        "Deleting a namespace removes ALL resources within it permanently",
        AffectedScope::Namespace,
    ),
    (
        "delete all",
        "Deleting all resources can cause severe service disruption",
        AffectedScope::Namespace,
    ),
    (
        "--all-namespaces",
        "Operation affects ALL namespaces in the cluster",
        AffectedScope::Cluster,
    ),
    (
        "-a ",
        "Operation affects ALL namespaces in the cluster",
        AffectedScope::Cluster,
    ),
    (
        "drain node",
        "Draining a node evicts all pods and can cause service disruption",
        AffectedScope::Cluster,
    ),
    (
        "cordon node",
        "Cordoning prevents new pods from scheduling on the node",
        AffectedScope::Cluster,
    ),
    (
        "delete node",
        "Deleting a node removes it from the cluster",
        AffectedScope::Cluster,
    ),
    (
        "delete pv ",
        "Deleting PersistentVolumes can cause permanent data loss",
        AffectedScope::Cluster,
    ),
    (
        "delete pvc ",
        "Deleting PersistentVolumeClaims can cause data loss",
        AffectedScope::Namespace,
    ),
    (
        "delete clusterrole",
        "Deleting ClusterRoles affects cluster-wide permissions",
        AffectedScope::Cluster,
    ),
    (
        "delete clusterrolebinding",
        "Deleting ClusterRoleBindings affects cluster-wide access",
        AffectedScope::Cluster,
    ),
    (
        "--force --grace-period=0",
        "Force deletion bypasses graceful termination",
        AffectedScope::Pod,
    ),
    (
        "kubectl exec",
        "Exec runs arbitrary commands inside a container",
        AffectedScope::Pod,
    ),
    (
        "rm -rf",
        "Recursive force deletion can destroy data irrecoverably",
        AffectedScope::Pod,
    ),
];

/// Dangerous operations: deletion of stateful or connectivity-critical
/// resources, or scale-to-zero.
const DANGEROUS_PATTERNS: &[(&str, &str, CommandCategory)] = &[
    (
        "delete deployment",
        "Deleting deployments stops all associated pods",
        CommandCategory::Delete,
    ),
    (
        "delete statefulset",
        "Deleting StatefulSets can cause data inconsistency",
        CommandCategory::Delete,
    ),
    (
        "delete daemonset",
        "Deleting DaemonSets stops pods on all nodes",
        CommandCategory::Delete,
    ),
    (
        "delete service",
        "Deleting services breaks network connectivity",
        CommandCategory::Delete,
    ),
    (
        "delete ingress",
        "Deleting ingress rules breaks external access",
        CommandCategory::Delete,
    ),
    (
        "delete secret",
        "Deleting secrets can break dependent applications",
        CommandCategory::Delete,
    ),
    (
        "delete configmap",
        "Deleting ConfigMaps can break dependent applications",
        CommandCategory::Delete,
    ),
    (
        "scale --replicas=0",
        "Scaling to zero stops all pods",
        CommandCategory::Write,
    ),
    (
        "--replicas=0",
        "Scaling to zero stops all pods",
        CommandCategory::Write,
    ),
    (
        "rollout undo",
        "Rolling back can introduce previous bugs",
        CommandCategory::Write,
    ),
    (
        "patch ",
        "Patching resources modifies their configuration",
        CommandCategory::Write,
    ),
    (
        "edit ",
        "Editing resources modifies their configuration",
        CommandCategory::Write,
    ),
    (
        "replace ",
        "Replacing resources can cause downtime",
        CommandCategory::Write,
    ),
];

/// Warning operations: routine mutations.
const WARNING_PATTERNS: &[(&str, &str, CommandCategory)] = &[
    (
        "delete pod",
        "Deleting pods causes temporary unavailability",
        CommandCategory::Delete,
    ),
    (
        "delete job",
        "Deleting jobs stops running tasks",
        CommandCategory::Delete,
    ),
    (
        "scale ",
        "Scaling changes the number of running pods",
        CommandCategory::Write,
    ),
    (
        "rollout restart",
        "Restarting causes temporary pod unavailability",
        CommandCategory::Write,
    ),
    (
        "apply ",
        "Applying changes modifies cluster state",
        CommandCategory::Write,
    ),
    (
        "create ",
        "Creating new resources modifies cluster state",
        CommandCategory::Write,
    ),
    (
        "label ",
        "Labeling can affect service selectors",
        CommandCategory::Write,
    ),
    (
        "annotate ",
        "Annotations can affect controller behavior",
        CommandCategory::Write,
    ),
    (
        "taint ",
        "Taints affect pod scheduling",
        CommandCategory::Admin,
    ),
];

/// Read-only operations, safe to run without approval.
const READ_ONLY_PATTERNS: &[&str] = &[
    "get ",
    "describe ",
    "logs ",
    "top ",
    "explain ",
    "api-resources",
    "api-versions",
    "cluster-info",
    "auth can-i",
    "config view",
    "version",
];

/// Namespaces whose contents keep the cluster itself alive. A routine
/// mutation inside one of these is treated as dangerous.
const SENSITIVE_NAMESPACES: &[&str] = &["kube-system", "kube-public", "kube-node-lease", "default"];

/// Substrings that suggest a production environment.
const PRODUCTION_INDICATORS: &[&str] = &["prod", "production", "live", "main", "master"];

/// The local risk classifier.
///
/// `classify` is a pure function of its inputs: no I/O, no clock, no
/// randomness, and it cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier {
    /// When set, critical commands are refused outright instead of gated.
    strict_mode: bool,
}

impl RiskClassifier {
    /// Create a classifier with the default (non-strict) policy.
    #[must_use]
    pub fn new() -> Self {
        Self { strict_mode: false }
    }

    /// Create a classifier that refuses critical commands outright.
    #[must_use]
    pub fn strict() -> Self {
        Self { strict_mode: true }
    }

    /// Whether strict mode is enabled.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict_mode
    }

    /// Classify a command against the pattern tiers.
    ///
    /// `namespace_hint` is the target namespace when the caller knows it;
    /// it feeds the sensitive-namespace and production heuristics.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn classify(&self, command: &str, namespace_hint: Option<&str>) -> RiskAssessment {
        let cmd = command.to_lowercase();
        let mut assessment = RiskAssessment::safe();

        // Read-only short-circuit: a pure read never needs gating, but a
        // command that also mentions delete/apply falls through to the tiers.
        let is_read_only = READ_ONLY_PATTERNS.iter().any(|p| cmd.contains(p));
        if is_read_only && !cmd.contains("delete") && !cmd.contains("apply") {
            return assessment;
        }

        if let Some((_, explanation, scope)) = CRITICAL_PATTERNS
            .iter()
            .find(|(pattern, _, _)| cmd.contains(pattern))
        {
            assessment.level = RiskLevel::Critical;
            assessment.requires_approval = true;
            assessment.allowed = !self.strict_mode;
            assessment.category = CommandCategory::Admin;
            assessment.scope = *scope;
            assessment.push_warning(*explanation);
            assessment.reason = "This operation has severe cluster-wide impact and could cause \
                                 service disruption or data loss"
                .to_string();
            if self.strict_mode {
                assessment.push_warning("Refused: critical operations are blocked in strict mode");
            }
        } else if let Some((_, explanation, category)) = DANGEROUS_PATTERNS
            .iter()
            .find(|(pattern, _, _)| cmd.contains(pattern))
        {
            assessment.level = RiskLevel::Dangerous;
            assessment.requires_approval = true;
            assessment.category = *category;
            assessment.scope = AffectedScope::Namespace;
            assessment.push_warning(*explanation);
            assessment.reason =
                "This operation modifies or deletes resources and should be performed with caution"
                    .to_string();
        } else if let Some((_, explanation, category)) = WARNING_PATTERNS
            .iter()
            .find(|(pattern, _, _)| cmd.contains(pattern))
        {
            assessment.level = RiskLevel::Warning;
            assessment.requires_approval = true;
            assessment.category = *category;
            assessment.scope = AffectedScope::Namespace;
            assessment.push_warning(*explanation);
            assessment.reason =
                "This operation modifies cluster state - review before proceeding".to_string();
        }

        // Mutations in system namespaces escalate one notch.
        if let Some(namespace) = namespace_hint
            && SENSITIVE_NAMESPACES.contains(&namespace)
        {
            assessment.push_warning(format!("Operating on sensitive namespace '{namespace}'"));
            if assessment.level == RiskLevel::Warning {
                assessment.escalate_to(RiskLevel::Dangerous);
            }
        }

        // Production heuristic: a production-looking name anywhere in the
        // command or namespace forces gating, even for otherwise-safe text.
        let namespace_lower = namespace_hint.map(str::to_lowercase);
        let hits_production = PRODUCTION_INDICATORS.iter().any(|indicator| {
            cmd.contains(indicator)
                || namespace_lower
                    .as_deref()
                    .is_some_and(|ns| ns.contains(indicator))
        });
        if hits_production {
            assessment
                .push_warning("Possible production environment detected - extra caution recommended");
            assessment.requires_approval = true;
            assessment.escalate_to(RiskLevel::Warning);
            if assessment.reason.starts_with("This is a read-only") {
                assessment.reason =
                    "Possible production environment detected - review before proceeding"
                        .to_string();
            }
        }

        assessment.recommendations = recommendations_for(assessment.level);

        debug!(
            command = %command,
            level = %assessment.level,
            requires_approval = assessment.requires_approval,
            allowed = assessment.allowed,
            "Classified command"
        );

        assessment
    }
}

/// Suggested precautions per risk level.
fn recommendations_for(level: RiskLevel) -> Vec<String> {
    let items: &[&str] = match level {
        RiskLevel::Critical => &[
            "Consider using --dry-run=client first to preview changes",
            "Ensure you have recent backups before proceeding",
            "Verify you're operating on the correct cluster context",
            "Consider scheduling this during a maintenance window",
        ],
        RiskLevel::Dangerous => &[
            "Use --dry-run=client to preview the operation",
            "Verify the target namespace and resources",
            "Consider backing up affected resources first",
        ],
        RiskLevel::Warning => &[
            "Review the affected resources before proceeding",
            "Consider using --dry-run=client for verification",
        ],
        RiskLevel::Safe => &[],
    };
    items.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(command: &str) -> RiskAssessment {
        RiskClassifier::new().classify(command, None)
    }

    #[test]
    fn test_read_only_is_safe() {
        let assessment = classify("kubectl get pods");
        assert_eq!(assessment.level, RiskLevel::Safe);
        assert!(!assessment.requires_approval);
        assert!(assessment.allowed);
    }

    #[test]
    fn test_describe_is_safe() {
        let assessment = classify("kubectl describe deployment web");
        assert_eq!(assessment.level, RiskLevel::Safe);
    }

    #[test]
    fn test_namespace_deletion_is_critical() {
        let assessment = classify("kubectl delete namespace staging");
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert!(assessment.requires_approval);
        assert!(assessment.allowed);
        assert_eq!(assessment.category, CommandCategory::Admin);
    }

    #[test]
    fn test_strict_mode_refuses_critical() {
        let assessment = RiskClassifier::strict().classify("kubectl drain node worker-1", None);
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert!(assessment.requires_approval);
        assert!(!assessment.allowed);
    }

    #[test]
    fn test_strict_mode_gates_dangerous_without_refusing() {
        let assessment = RiskClassifier::strict().classify("kubectl delete service api", None);
        assert_eq!(assessment.level, RiskLevel::Dangerous);
        assert!(assessment.requires_approval);
        assert!(assessment.allowed);
    }

    #[test]
    fn test_all_critical_patterns_require_approval() {
        let classifier = RiskClassifier::new();
        for (pattern, _, _) in CRITICAL_PATTERNS {
            let cmd = format!("kubectl {pattern} target");
            let assessment = classifier.classify(&cmd, None);
            assert!(
                assessment.requires_approval,
                "critical pattern {pattern:?} must require approval"
            );
            assert_eq!(assessment.level, RiskLevel::Critical, "pattern {pattern:?}");
        }
    }

    #[test]
    fn test_strict_mode_refuses_every_critical_pattern() {
        let classifier = RiskClassifier::strict();
        for (pattern, _, _) in CRITICAL_PATTERNS {
            let cmd = format!("kubectl {pattern} target");
            assert!(
                !classifier.classify(&cmd, None).allowed,
                "strict mode must refuse {pattern:?}"
            );
        }
    }

    #[test]
    fn test_statefulset_deletion_is_dangerous() {
        let assessment = classify("kubectl delete statefulset db");
        assert_eq!(assessment.level, RiskLevel::Dangerous);
        assert!(assessment.requires_approval);
        assert_eq!(assessment.category, CommandCategory::Delete);
    }

    #[test]
    fn test_scale_to_zero_is_dangerous() {
        let assessment = classify("kubectl scale deployment web --replicas=0");
        assert_eq!(assessment.level, RiskLevel::Dangerous);
    }

    #[test]
    fn test_pod_deletion_is_warning() {
        let assessment = classify("kubectl delete pod web-7d9f");
        assert_eq!(assessment.level, RiskLevel::Warning);
        assert!(assessment.requires_approval);
    }

    #[test]
    fn test_scale_is_warning() {
        let assessment = classify("kubectl scale deployment web --replicas=3");
        assert_eq!(assessment.level, RiskLevel::Warning);
    }

    #[test]
    fn test_exec_is_critical() {
        let assessment = classify("kubectl exec -it web-1 -- /bin/sh");
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert!(assessment.requires_approval);
        assert!(assessment.allowed);
    }

    #[test]
    fn test_rm_rf_is_critical() {
        let assessment = classify("kubectl exec web-1 -- rm -rf /data");
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert!(assessment.requires_approval);
    }

    #[test]
    fn test_force_grace_period_zero_is_critical() {
        let assessment = classify("kubectl delete pod web --force --grace-period=0");
        assert_eq!(assessment.level, RiskLevel::Critical);
    }

    #[test]
    fn test_sensitive_namespace_escalates_warning() {
        let classifier = RiskClassifier::new();
        let assessment = classifier.classify("kubectl delete pod coredns-abc", Some("kube-system"));
        assert_eq!(assessment.level, RiskLevel::Dangerous);
    }

    #[test]
    fn test_production_namespace_forces_approval() {
        let classifier = RiskClassifier::new();
        let assessment = classifier.classify("kubectl rollout status deployment web", Some("prod"));
        assert!(assessment.requires_approval);
        assert!(assessment.level >= RiskLevel::Warning);
    }

    #[test]
    fn test_production_substring_in_command() {
        let assessment = classify("kubectl delete namespace prod-checkout");
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert!(assessment.requires_approval);
        assert!(
            assessment
                .warnings
                .iter()
                .any(|w| w.contains("production environment"))
        );
    }

    #[test]
    fn test_unrecognized_command_degrades_to_safe() {
        let assessment = classify("frobnicate the widget");
        assert_eq!(assessment.level, RiskLevel::Safe);
        assert!(!assessment.requires_approval);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let a = classify("kubectl delete deployment web");
        let b = classify("kubectl delete deployment web");
        assert_eq!(a.level, b.level);
        assert_eq!(a.warnings, b.warnings);
        assert_eq!(a.reason, b.reason);
    }

    #[test]
    fn test_recommendations_track_level() {
        assert!(classify("kubectl get pods").recommendations.is_empty());
        assert!(!classify("kubectl delete namespace x").recommendations.is_empty());
    }
}
