//! Kubeward cluster - the seam between the agent loop and a real cluster.
//!
//! The gateway never shells out to `kubectl` itself. It drives any
//! [`ClusterExecutor`] implementation through the [`ExecutionEngine`], which
//! turns executor failures into non-success [`ToolResult`]s, measures
//! wall-clock duration, and bounds each call with a timeout. There are no
//! retries: a cluster command is not assumed idempotent.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod engine;
mod error;
mod executor;
mod result;

pub use engine::ExecutionEngine;
pub use error::{ClusterError, ClusterResult};
pub use executor::ClusterExecutor;
pub use result::ToolResult;
