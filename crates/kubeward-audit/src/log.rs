//! Best-effort audit log front-end.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::error;

use crate::entry::{AuditEntry, AuditFilter};
use crate::error::AuditResult;
use crate::sink::AuditSink;

/// Wraps an [`AuditSink`] so that recording never fails the tool path.
///
/// A sink failure is logged and counted but not propagated: the tool call
/// already happened and aborting it would not undo anything. Operators can
/// watch [`AuditLog::dropped_writes`] to detect a broken sink.
#[derive(Clone)]
pub struct AuditLog {
    sink: Arc<dyn AuditSink>,
    dropped_writes: Arc<AtomicU64>,
}

impl AuditLog {
    /// Create a log over a sink.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
            dropped_writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an entry, best-effort.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(e) = self.sink.append(entry) {
            self.dropped_writes.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, command = %entry.command, "Failed to write audit entry");
        }
    }

    /// Query recorded entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be read.
    pub fn query(&self, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        self.sink.query(filter)
    }

    /// Number of entries that could not be written.
    #[must_use]
    pub fn dropped_writes(&self) -> u64 {
        self.dropped_writes.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("dropped_writes", &self.dropped_writes())
            .finish_non_exhaustive()
    }
}
