//! # jaervice-runtime
//!
//! Hosted model providers for jaervice.
//!
//! ## Providers
//!
//! - **Groq** (default): OpenAI-compatible chat completions with tool calling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jaervice_runtime::{GroqConfig, connect};
//!
//! let provider = connect(GroqConfig::from_env()?)?;
//! let agent = AgentBuilder::new()
//!     .provider(provider)
//!     .build()?;
//! ```

use std::sync::Arc;

pub mod groq;
pub mod wire;

pub use groq::{GroqConfig, GroqProvider};

use jaervice_core::{LlmProvider, Result, RetryPolicy, RetryingProvider};

/// Build the Groq provider wrapped in the configured retry policy
pub fn connect(config: GroqConfig) -> Result<Arc<dyn LlmProvider>> {
    let policy = RetryPolicy::with_max_retries(config.max_retries);
    tracing::info!(
        endpoint = %config.base_url,
        max_retries = policy.max_retries,
        "Connecting Groq provider"
    );

    let provider = GroqProvider::from_config(config)?;
    Ok(Arc::new(RetryingProvider::new(Arc::new(provider), policy)))
}
