//! # jaervice-tools
//!
//! Search tools the model can call while answering.
//!
//! | Tool | Backend |
//! |------|---------|
//! | `web_search` | Tavily, general topic |
//! | `news_search` | Tavily, news topic |
//! | `news_headlines` | NewsAPI |
//! | `wikipedia` | MediaWiki search API |
//!
//! Every tool takes a single free-text `query` and returns plain text.

pub mod backend;
pub mod config;
pub mod svckit;

use std::sync::Arc;
use std::time::Duration;

use jaervice_core::{AgentError, Result, ToolRegistry};

pub use config::ToolsConfig;

use backend::{NewsApiClient, SearchBackend, TavilyClient, TavilyTopic, WikipediaClient};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{NewsHeadlinesTool, NewsSearchTool, WebSearchTool, WikipediaTool};
}

const USER_AGENT: &str = concat!("jaervice/", env!("CARGO_PKG_VERSION"));

/// One backend per tool
pub struct ToolBackends {
    pub web: Arc<dyn SearchBackend>,
    pub news: Arc<dyn SearchBackend>,
    pub headlines: Arc<dyn SearchBackend>,
    pub encyclopedia: Arc<dyn SearchBackend>,
}

impl ToolBackends {
    /// Live HTTP backends sharing one client
    pub fn live(config: &ToolsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;

        if config.tavily_api_key.is_none() {
            tracing::warn!("TAVILY_API_KEY not set; web_search and news_search will report it");
        }
        if config.news_api_key.is_none() {
            tracing::warn!("NEWS_API_KEY not set; news_headlines will report it");
        }

        Ok(Self {
            web: Arc::new(TavilyClient::new(
                http.clone(),
                config.tavily_api_key.clone(),
                TavilyTopic::General,
            )),
            news: Arc::new(TavilyClient::new(
                http.clone(),
                config.tavily_api_key.clone(),
                TavilyTopic::News,
            )),
            headlines: Arc::new(NewsApiClient::new(http.clone(), config.news_api_key.clone())),
            encyclopedia: Arc::new(WikipediaClient::new(http)),
        })
    }
}

/// Registry with every tool, in a fixed order
pub fn build_registry(backends: ToolBackends, max_results: usize) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tools::WebSearchTool::new(backends.web, max_results));
    registry.register(tools::NewsSearchTool::new(backends.news, max_results));
    registry.register(tools::NewsHeadlinesTool::new(backends.headlines, max_results));
    registry.register(tools::WikipediaTool::new(backends.encyclopedia));
    registry
}

/// Registry backed by the live services
pub fn default_registry(config: &ToolsConfig) -> Result<ToolRegistry> {
    let registry = build_registry(ToolBackends::live(config)?, config.max_results);
    tracing::info!(tools = ?registry.names(), "Tools registered");
    Ok(registry)
}
