//! Retrying provider wrapper
//!
//! Retries transient model failures (unavailable, timeout, rate limited) with
//! bounded exponential backoff. Everything else surfaces on the first attempt.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ModelError;
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider, ProviderInfo};
use crate::tool::ToolSchema;

/// Backoff settings for transient provider failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Policy that retries without sleeping
    pub const fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based): base * 2^retry, capped
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Provider decorator applying a [`RetryPolicy`] to `complete`
pub struct RetryingProvider {
    inner: Arc<dyn LlmProvider>,
    policy: RetryPolicy,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl LlmProvider for RetryingProvider {
    fn info(&self) -> ProviderInfo {
        self.inner.info()
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion, ModelError> {
        let mut retry = 0;

        loop {
            match self.inner.complete(messages, tools, options).await {
                Ok(completion) => return Ok(completion),
                Err(e) if e.is_retryable() && retry < self.policy.max_retries => {
                    let delay = self.policy.delay_for(retry);
                    tracing::warn!(
                        error = %e,
                        retry = retry + 1,
                        max_retries = self.policy.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Transient model error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) if e.is_retryable() => {
                    return Err(ModelError::RetriesExhausted {
                        attempts: retry + 1,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
