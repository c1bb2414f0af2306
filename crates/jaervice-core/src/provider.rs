//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for hosted chat-completion backends so the
//! dispatch loop works with any of them without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jaervice_core::provider::{GenerationOptions, LlmProvider};
//!
//! let completion = provider.complete(conversation.messages(), &tools.list(), &options).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::message::Message;
use crate::tool::{ToolCall, ToolSchema};

/// Default hosted model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (provider default when unset)
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// System prompt, prepended on the wire by the provider
    #[serde(default)]
    pub system_prompt: Option<String>,
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: default_temperature(),
            max_tokens: None,
            system_prompt: None,
        }
    }
}

/// What the model wants next
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelResponse {
    /// Final answer for the user
    Final { text: String },

    /// The model asks for tools before answering
    ToolCalls {
        calls: Vec<ToolCall>,
        #[serde(default)]
        raw_text: Option<String>,
    },
}

impl ModelResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Final { text: text.into() }
    }

    pub const fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::ToolCalls {
            calls,
            raw_text: None,
        }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// Final text or tool calls
    pub response: ModelResponse,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn new(response: ModelResponse, model: impl Into<String>) -> Self {
        Self {
            response,
            model: model.into(),
            usage: None,
        }
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Provider metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "Groq")
    pub name: String,

    /// Endpoint the provider talks to
    pub endpoint: String,

    /// Whether tool/function calling is supported
    pub supports_tools: bool,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The dispatch loop works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get provider information and capabilities
    fn info(&self) -> ProviderInfo;

    /// Check if the provider is reachable and the credentials are accepted
    async fn health_check(&self) -> bool;

    /// Generate a completion from the transcript and the tools the model may call
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion, ModelError>;
}
