//! Search Backends
//!
//! Abstractions and HTTP clients for the services behind the tools.

mod mock;
mod newsapi;
mod tavily;
mod wikipedia;

pub use mock::MockSearchBackend;
pub use newsapi::NewsApiClient;
pub use tavily::{TavilyClient, TavilyTopic};
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;
use jaervice_core::ToolError;
use serde::{Deserialize, Serialize};

/// One search hit
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Snippet, article description or page extract
    #[serde(default)]
    pub snippet: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Results of one backend query, best first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Short synthesized answer, when the service provides one
    #[serde(default)]
    pub answer: Option<String>,

    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && self.answer.as_deref().is_none_or(|a| a.trim().is_empty())
    }
}

/// Search backend trait (Strategy pattern)
///
/// Implement this for each service: Tavily, NewsAPI, Wikipedia, etc.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a free-text query, returning at most `limit` hits
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults, ToolError>;

    /// Service name, used in error messages
    fn name(&self) -> &str;
}

/// Classify a transport-level failure
pub(crate) fn transport_error(e: &reqwest::Error) -> ToolError {
    if e.is_timeout() {
        ToolError::Timeout(e.to_string())
    } else if e.is_decode() {
        ToolError::Parse(e.to_string())
    } else {
        ToolError::Network(e.to_string())
    }
}

/// Turn a non-success response into `ToolError::Api`
pub(crate) async fn api_error(service: &str, resp: reqwest::Response) -> ToolError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();

    ToolError::Api {
        service: service.to_string(),
        status,
        message: error_message(&body),
    }
}

/// Pull a human-readable message out of a JSON error body
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .or_else(|| v.pointer("/error/message"))
            .or_else(|| v.pointer("/detail/error"))
            .or_else(|| v.get("error"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    });

    message.unwrap_or_else(|| body.chars().take(200).collect())
}
