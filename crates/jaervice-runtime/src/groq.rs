//! Groq LLM Provider
//!
//! Implementation of `LlmProvider` against Groq's OpenAI-compatible
//! chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use jaervice_core::{
    AgentError, Message, ModelError, ToolSchema,
    error::Result,
    provider::{Completion, GenerationOptions, LlmProvider, ProviderInfo},
};
use reqwest::{Client, StatusCode};

use crate::wire::{ChatRequest, ChatResponse, ErrorEnvelope};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq provider configuration
#[derive(Clone)]
pub struct GroqConfig {
    /// Bearer token
    pub api_key: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for transient failures
    pub max_retries: u32,
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 60,
            max_retries: 2,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `GROQ_API_KEY` (required), `GROQ_BASE_URL`, `GROQ_TIMEOUT_SECS`
    /// and `GROQ_MAX_RETRIES`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("GROQ_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key.trim());

        if let Some(url) = lookup("GROQ_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("GROQ_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .trim()
                .parse()
                .ok()
                .filter(|&secs: &u64| secs > 0)
                .ok_or_else(|| AgentError::Config(format!("GROQ_TIMEOUT_SECS: bad value {raw:?}")))?;
        }
        if let Some(raw) = lookup("GROQ_MAX_RETRIES") {
            config.max_retries = raw
                .trim()
                .parse()
                .map_err(|_| AgentError::Config(format!("GROQ_MAX_RETRIES: bad value {raw:?}")))?;
        }

        Ok(config)
    }
}

/// Groq LLM provider
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
}

impl GroqProvider {
    pub fn from_config(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(GroqConfig::from_env()?)
    }

    pub const fn config(&self) -> &GroqConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url)
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "Groq".into(),
            endpoint: self.config.base_url.clone(),
            supports_tools: true,
        }
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(self.url("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "Groq health check rejected");
                false
            }
            Err(e) => {
                tracing::warn!("Groq health check failed: {}", e);
                false
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> std::result::Result<Completion, ModelError> {
        let request = ChatRequest::build(messages, tools, options);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending completion request"
        );

        let resp = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }

        let body: ChatResponse = resp.json().await.map_err(map_transport)?;
        let completion = body.into_completion(&options.model)?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        Ok(completion)
    }
}

/// Map a non-success HTTP status to the error taxonomy
pub fn map_status(status: StatusCode, body: &str) -> ModelError {
    let detail = error_detail(status, body);

    match status.as_u16() {
        401 | 403 => ModelError::Auth(detail),
        429 => ModelError::RateLimited(detail),
        500..=599 => ModelError::Unavailable(detail),
        _ => ModelError::InvalidRequest(detail),
    }
}

fn map_transport(e: reqwest::Error) -> ModelError {
    if e.is_timeout() {
        ModelError::Timeout(e.to_string())
    } else if e.is_decode() {
        ModelError::InvalidResponse(e.to_string())
    } else {
        // connect failures and everything else at the transport layer
        ModelError::Unavailable(e.to_string())
    }
}

fn error_detail(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    if message.trim().is_empty() {
        status.to_string()
    } else {
        format!("{status}: {message}")
    }
}
