//! Kubeward LLM - provider abstraction for tool-calling chat models.
//!
//! The gateway never talks to a concrete model API; it drives any backend
//! implementing [`LlmProvider`]: send conversation + tool definitions,
//! receive streamed text or tool calls. Concrete HTTP providers live outside
//! this workspace.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod provider;
mod types;

pub use error::{LlmError, LlmResult};
pub use provider::{LlmProvider, StreamBox};
pub use types::{
    LlmResponse, LlmToolDefinition, Message, MessageRole, StopReason, StreamEvent, ToolCall,
    ToolCallResult,
};
