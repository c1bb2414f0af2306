//! Mock provider for testing
//!
//! Deterministic, configurable model responses without network dependencies.
//! Records every transcript it is handed so tests can check what the loop sent.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ModelError;
use crate::message::{Message, Role};
use crate::provider::{Completion, GenerationOptions, LlmProvider, ModelResponse, ProviderInfo};
use crate::tool::{ToolCall, ToolSchema};

/// Response function: receives the 0-based call number and the transcript
type Responder = dyn Fn(usize, &[Message]) -> Result<ModelResponse, ModelError> + Send + Sync;

/// Mock LLM provider
pub struct MockProvider {
    responder: Box<Responder>,
    latency: Duration,
    calls: AtomicUsize,
    transcripts: Mutex<Vec<Vec<Message>>>,
}

impl MockProvider {
    /// Build from a response function
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(usize, &[Message]) -> Result<ModelResponse, ModelError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            transcripts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the same text
    pub fn fixed(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_, _| Ok(ModelResponse::text(text.clone())))
    }

    /// Echo back the last user message
    pub fn echo() -> Self {
        Self::from_fn(|_, messages| {
            let last_user = messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(ModelResponse::text(last_user))
        })
    }

    /// Play back responses in order; calls past the end fail
    pub fn scripted(steps: Vec<Result<ModelResponse, ModelError>>) -> Self {
        let queue = Mutex::new(VecDeque::from(steps));
        Self::from_fn(move |_, _| {
            queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| Err(ModelError::InvalidRequest("mock script exhausted".into())))
        })
    }

    /// Request the same tool on every call, never converging
    pub fn always_tool(tool: impl Into<String>, query: impl Into<String>) -> Self {
        let tool = tool.into();
        let query = query.into();
        Self::from_fn(move |n, _| {
            Ok(ModelResponse::tool_calls(vec![
                ToolCall::new(format!("call_{n}"), tool.clone()).with_argument("query", query.clone()),
            ]))
        })
    }

    /// Sleep before every response
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every transcript received, in call order
    pub fn transcripts(&self) -> Vec<Vec<Message>> {
        self.transcripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "Mock".into(),
            endpoint: "memory://mock".into(),
            supports_tools: true,
        }
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion, ModelError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.transcripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(messages.to_vec());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        (self.responder)(n, messages).map(|response| Completion::new(response, &options.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_then_exhausted() {
        let mock = MockProvider::scripted(vec![Ok(ModelResponse::text("one"))]);
        let opts = GenerationOptions::default();

        let first = mock.complete(&[], &[], &opts).await.unwrap();
        assert_eq!(first.response, ModelResponse::text("one"));
        assert!(mock.complete(&[], &[], &opts).await.is_err());
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_echo_records_transcripts() {
        let mock = MockProvider::echo();
        let opts = GenerationOptions::default();
        let messages = vec![Message::user("ping")];

        let completion = mock.complete(&messages, &[], &opts).await.unwrap();
        assert_eq!(completion.response, ModelResponse::text("ping"));
        assert_eq!(mock.transcripts(), vec![messages]);
    }
}
