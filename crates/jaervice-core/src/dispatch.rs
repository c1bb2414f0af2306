//! Dispatch Loop
//!
//! Drives one user turn: call the model, run any tools it asks for, feed the
//! results back, and repeat until the model answers without tool calls.
//!
//! ```text
//!   AwaitingModel ──final──────────▶ Done
//!        │   ▲
//!  tool  │   │ all results appended
//!  calls ▼   │
//!   AwaitingTools
//!
//!   AwaitingModel ──error / cap───▶ Failed
//! ```

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider, ModelResponse};
use crate::tool::{ToolCall, ToolRegistry, ToolSchema};

/// Default cap on model round trips per turn
pub const DEFAULT_MAX_ROUND_TRIPS: usize = 10;

/// Built-in system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Jaervice, a friendly and concise AI assistant. \
Use the search tools when a question needs current information, news, or facts you are unsure about, \
and cite the links they return. Answer directly when no lookup is needed.";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Maximum model calls in one turn before giving up
    pub max_round_trips: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_round_trips: DEFAULT_MAX_ROUND_TRIPS,
            generation: GenerationOptions {
                system_prompt: Some(DEFAULT_SYSTEM_PROMPT.into()),
                ..GenerationOptions::default()
            },
        }
    }
}

impl AgentConfig {
    /// Read `MAX_TOOL_ROUND_TRIPS`, `GROQ_MODEL`, `GROQ_TEMPERATURE` and `SYSTEM_PROMPT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("MAX_TOOL_ROUND_TRIPS") {
            config.max_round_trips = raw
                .trim()
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or_else(|| AgentError::Config(format!("MAX_TOOL_ROUND_TRIPS: bad value {raw:?}")))?;
        }
        if let Some(model) = lookup("GROQ_MODEL").filter(|m| !m.trim().is_empty()) {
            config.generation.model = model;
        }
        if let Some(raw) = lookup("GROQ_TEMPERATURE") {
            config.generation.temperature = raw
                .trim()
                .parse()
                .map_err(|_| AgentError::Config(format!("GROQ_TEMPERATURE: bad value {raw:?}")))?;
        }
        if let Some(prompt) = lookup("SYSTEM_PROMPT") {
            config.generation.system_prompt = Some(prompt).filter(|p| !p.trim().is_empty());
        }

        Ok(config)
    }
}

/// Outcome of a successful turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Final assistant text
    pub reply: String,

    /// Model calls made
    pub round_trips: usize,

    /// Tool calls executed
    pub tool_calls: usize,
}

/// Dispatch loop states
#[derive(Debug)]
enum LoopState {
    AwaitingModel,
    AwaitingTools(Vec<ToolCall>),
    Done(String),
    Failed(AgentError),
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Run one turn. The conversation must end with the new user message.
    ///
    /// Messages are appended in place; on failure everything appended before
    /// the failure stays in the transcript.
    pub async fn run(&self, conversation: &mut Conversation) -> Result<TurnReport> {
        if conversation.last().map(|m| m.role) != Some(Role::User) {
            return Err(AgentError::InvalidTranscript(
                "a turn must start from a user message".into(),
            ));
        }

        let descriptors = self.tools.list();
        let mut round_trips = 0;
        let mut tool_calls = 0;
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel if round_trips >= self.config.max_round_trips => {
                    LoopState::Failed(AgentError::LoopExceeded(self.config.max_round_trips))
                }
                LoopState::AwaitingModel => {
                    round_trips += 1;
                    self.call_model(conversation, &descriptors, round_trips).await
                }
                LoopState::AwaitingTools(calls) => {
                    tool_calls += calls.len();
                    self.run_tools(conversation, &calls).await;
                    LoopState::AwaitingModel
                }
                LoopState::Done(reply) => {
                    return Ok(TurnReport {
                        reply,
                        round_trips,
                        tool_calls,
                    });
                }
                LoopState::Failed(err) => {
                    tracing::warn!(error = %err, round_trips, "Turn failed");
                    return Err(err);
                }
            };
        }
    }

    async fn call_model(
        &self,
        conversation: &mut Conversation,
        descriptors: &[ToolSchema],
        round_trip: usize,
    ) -> LoopState {
        tracing::debug!(
            round_trip,
            messages = conversation.len(),
            est_tokens = conversation.estimate_tokens(),
            "Calling model"
        );

        let completion = match self
            .provider
            .complete(conversation.messages(), descriptors, &self.config.generation)
            .await
        {
            Ok(completion) => completion,
            Err(e) => return LoopState::Failed(e.into()),
        };

        match completion.response {
            ModelResponse::ToolCalls { calls, raw_text } if !calls.is_empty() => {
                conversation.push(Message::assistant_with_calls(
                    raw_text.unwrap_or_default(),
                    calls.clone(),
                ));
                LoopState::AwaitingTools(calls)
            }
            ModelResponse::ToolCalls { raw_text, .. } => {
                let text = raw_text.unwrap_or_default();
                conversation.push(Message::assistant(text.clone()));
                LoopState::Done(text)
            }
            ModelResponse::Final { text } => {
                conversation.push(Message::assistant(text.clone()));
                LoopState::Done(text)
            }
        }
    }

    /// Run calls one at a time in model order, one tool message per call
    async fn run_tools(&self, conversation: &mut Conversation, calls: &[ToolCall]) {
        for call in calls {
            tracing::debug!(tool = %call.name, id = %call.id, "Executing tool");
            let result = self.tools.dispatch(call).await;
            conversation.push(Message::from(&result));
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: Option<String>) -> Self {
        self.config.generation.system_prompt = prompt;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    #[must_use]
    pub const fn max_round_trips(mut self, max: usize) -> Self {
        self.config.max_round_trips = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_round_trips == 0 {
            return Err(AgentError::Config("max_round_trips must be at least 1".into()));
        }

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
