//! Kubeward events - the single ordered output stream of one request.
//!
//! Everything a client sees about one submitted message flows through one
//! [`channel`]: session announcement, tool executions, approval requests,
//! streamed text, and a terminal [`AgentEvent::End`]. Ordering is by
//! construction (one mpsc channel, one producing task), not by timestamps.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod channel;
mod event;

pub use channel::{EventEmitter, EventReceiver, channel};
pub use event::AgentEvent;
