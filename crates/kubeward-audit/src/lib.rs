//! Kubeward audit - append-only record of every tool dispatch.
//!
//! Every dispatched tool call produces exactly one [`AuditEntry`], whether it
//! executed, failed, or was rejected before execution. Entries flow through an
//! [`AuditSink`]; the [`AuditLog`] wrapper makes recording best-effort so a
//! broken sink can never fail a tool call, while keeping the failure
//! detectable through a dropped-writes counter.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod entry;
mod error;
mod log;
mod sink;

pub use entry::{ApprovalOutcome, AuditEntry, AuditFilter};
pub use error::{AuditError, AuditResult};
pub use log::AuditLog;
pub use sink::{AuditSink, JsonlAuditSink, MemoryAuditSink};
