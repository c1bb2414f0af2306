//! Tavily search client

use async_trait::async_trait;
use jaervice_core::ToolError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{SearchBackend, SearchHit, SearchResults, api_error, transport_error};

pub const TAVILY_URL: &str = "https://api.tavily.com/search";

/// Tavily index to query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TavilyTopic {
    General,
    News,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    topic: TavilyTopic,
    max_results: usize,
    include_answer: bool,
    search_depth: &'static str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

pub struct TavilyClient {
    http: Client,
    api_key: Option<String>,
    topic: TavilyTopic,
    endpoint: String,
}

impl TavilyClient {
    pub fn new(http: Client, api_key: Option<String>, topic: TavilyTopic) -> Self {
        Self {
            http,
            api_key,
            topic,
            endpoint: TAVILY_URL.into(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub const fn topic(&self) -> TavilyTopic {
        self.topic
    }
}

#[async_trait]
impl SearchBackend for TavilyClient {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ToolError::MissingCredentials("Tavily".into()))?;

        let body = TavilyRequest {
            query,
            topic: self.topic,
            max_results: limit,
            include_answer: true,
            search_depth: "basic",
        };

        tracing::debug!(topic = ?self.topic, query, "Tavily search");

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !resp.status().is_success() {
            return Err(api_error("Tavily", resp).await);
        }

        let parsed: TavilyResponse = resp.json().await.map_err(|e| transport_error(&e))?;
        Ok(parsed.into_results(limit))
    }

    fn name(&self) -> &str {
        "Tavily"
    }
}

impl TavilyResponse {
    fn into_results(self, limit: usize) -> SearchResults {
        SearchResults {
            answer: self.answer.filter(|a| !a.trim().is_empty()),
            hits: self
                .results
                .into_iter()
                .take(limit)
                .map(|r| SearchHit::new(r.title, r.url, r.content))
                .collect(),
        }
    }
}
