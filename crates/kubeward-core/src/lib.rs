//! Kubeward Core - shared identifiers and risk types.
//!
//! Every other crate in the workspace depends on these definitions:
//! - Newtype ids (`SessionId`, `ApprovalId`) backed by UUIDv4
//! - A `Timestamp` wrapper for consistent time handling
//! - The four-tier `RiskLevel` used by the classifier and the audit trail

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod types;

pub use types::{ApprovalId, RiskLevel, SessionId, Timestamp};
