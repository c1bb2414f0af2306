//! # jaervice-core
//!
//! Conversation state, tool registry and the model/tool dispatch loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Chatbot                              │
//! │  ┌──────────────┐   ┌─────────────────────────────────────┐  │
//! │  │ SessionStore │──▶│               Agent                 │  │
//! │  │ (per thread) │   │  ┌──────────┐ ┌──────────────────┐  │  │
//! │  └──────────────┘   │  │ Dispatch │─│   LlmProvider    │  │  │
//! │                     │  │   Loop   │ │ (+ retry policy) │  │  │
//! │                     │  └────┬─────┘ └──────────────────┘  │  │
//! │                     │  ┌────▼─────────┐                   │  │
//! │                     │  │ ToolRegistry │                   │  │
//! │                     │  └──────────────┘                   │  │
//! │                     └─────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the loop independent of the hosted backend;
//! `jaervice-runtime` supplies the HTTP implementation.

pub mod chat;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod mock;
pub mod provider;
pub mod retry;
pub mod session;
pub mod tool;

pub use chat::{ChatReply, Chatbot};
pub use dispatch::{Agent, AgentBuilder, AgentConfig, TurnReport};
pub use error::{AgentError, ModelError, Result, ToolError};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider, ModelResponse};
pub use retry::{RetryPolicy, RetryingProvider};
pub use session::{Session, SessionStore, ThreadId};
pub use tool::{ParameterSchema, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
