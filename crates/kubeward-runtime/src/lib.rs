//! Kubeward runtime - the agent loop behind the gateway.
//!
//! One submitted chat message becomes one spawned task driving the loop:
//! stream the model, collect proposed tool calls, classify each against the
//! safety rules, hold risky ones for approval, execute approved ones against
//! the cluster, audit every dispatch, feed results back, repeat until the
//! model answers in plain text. Everything the client sees arrives on a
//! single ordered event stream.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod runtime;
mod session;
mod state;

pub use error::{RuntimeError, RuntimeResult};
pub use runtime::AgentRuntime;
pub use session::{Session, SessionStore};
pub use state::LoopState;
