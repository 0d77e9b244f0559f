//! Audit sink trait and implementations.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::entry::{AuditEntry, AuditFilter};
use crate::error::{AuditError, AuditResult};

/// Storage backend for audit entries.
///
/// Implementations must be thread-safe. Entries are append-only; there is no
/// update or delete.
pub trait AuditSink: Send + Sync {
    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be persisted.
    fn append(&self, entry: &AuditEntry) -> AuditResult<()>;

    /// Query entries matching a filter, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or deserialization fails.
    fn query(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>>;
}

/// In-memory sink, used in tests and when no audit path is configured.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AuditError::SinkError("audit sink lock poisoned".to_string()))?;
        entries.push(entry.clone());
        Ok(())
    }

    fn query(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AuditError::SinkError("audit sink lock poisoned".to_string()))?;
        Ok(entries.iter().filter(|e| e.matches(filter)).cloned().collect())
    }
}

/// Append-only JSON-lines file sink, one entry per line.
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    // Serializes appends so concurrent entries never interleave within a line.
    write_lock: Mutex<()>,
}

impl JsonlAuditSink {
    /// Create a sink writing to `path`. The file is created on first append.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// The file path this sink writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        let line = serde_json::to_string(entry)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AuditError::SinkError("audit sink lock poisoned".to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn query(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(&line)?;
            if entry.matches(filter) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ApprovalOutcome;
    use kubeward_core::{RiskLevel, SessionId, Timestamp};

    fn entry(command: &str, risk_level: RiskLevel, success: bool) -> AuditEntry {
        AuditEntry {
            timestamp: Timestamp::now(),
            session_id: SessionId::new(),
            actor: "operator".to_string(),
            tool: "kubectl".to_string(),
            command: command.to_string(),
            risk_level,
            approval_outcome: ApprovalOutcome::NotRequired,
            success,
            error: None,
        }
    }

    #[test]
    fn test_memory_sink_append_and_query() {
        let sink = MemoryAuditSink::new();
        sink.append(&entry("kubectl get pods", RiskLevel::Safe, true))
            .unwrap();
        sink.append(&entry("kubectl delete pod web", RiskLevel::Warning, true))
            .unwrap();

        let all = sink.query(&AuditFilter::all()).unwrap();
        assert_eq!(all.len(), 2);

        let mutations = sink.query(&AuditFilter::all().mutations()).unwrap();
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].command, "kubectl delete pod web");
    }

    #[test]
    fn test_memory_sink_preserves_insertion_order() {
        let sink = MemoryAuditSink::new();
        for i in 0..5 {
            sink.append(&entry(&format!("cmd-{i}"), RiskLevel::Safe, true))
                .unwrap();
        }
        let all = sink.query(&AuditFilter::all()).unwrap();
        let commands: Vec<_> = all.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, ["cmd-0", "cmd-1", "cmd-2", "cmd-3", "cmd-4"]);
    }

    #[test]
    fn test_jsonl_sink_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlAuditSink::new(dir.path().join("audit.log")).unwrap();

        sink.append(&entry("kubectl get pods", RiskLevel::Safe, true))
            .unwrap();
        sink.append(&entry(
            "kubectl delete namespace prod",
            RiskLevel::Critical,
            false,
        ))
        .unwrap();

        let all = sink.query(&AuditFilter::all()).unwrap();
        assert_eq!(all.len(), 2);

        let errors = sink.query(&AuditFilter::all().errors()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_jsonl_sink_query_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlAuditSink::new(dir.path().join("never-written.log")).unwrap();
        assert!(sink.query(&AuditFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn test_jsonl_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonlAuditSink::new(dir.path().join("nested/deep/audit.log")).unwrap();
        sink.append(&entry("kubectl get pods", RiskLevel::Safe, true))
            .unwrap();
        assert_eq!(sink.query(&AuditFilter::all()).unwrap().len(), 1);
    }
}
