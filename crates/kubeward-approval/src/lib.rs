//! Kubeward approval - human-in-the-loop gate for risky tool calls.
//!
//! When the classifier marks a proposed command as requiring approval, the
//! agent loop parks the call here and waits. The wait is bounded and fails
//! closed: if nobody decides before the timeout, the call is treated as
//! rejected. Decisions arrive out-of-band through
//! [`ApprovalGateway::resolve`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod gateway;
mod pending;

pub use error::{ApprovalError, ApprovalResult};
pub use gateway::{ApprovalGateway, PendingTicket};
pub use pending::{PendingApproval, ResolutionState, ToolResolution};
