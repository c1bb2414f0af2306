//! NewsAPI client

use async_trait::async_trait;
use jaervice_core::ToolError;
use reqwest::Client;
use serde::Deserialize;

use super::{SearchBackend, SearchHit, SearchResults, api_error, transport_error};

pub const NEWSAPI_URL: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub struct NewsApiClient {
    http: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl NewsApiClient {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key,
            endpoint: NEWSAPI_URL.into(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchBackend for NewsApiClient {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ToolError::MissingCredentials("NewsAPI".into()))?;

        tracing::debug!(query, "NewsAPI search");

        let page_size = limit.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .header("X-Api-Key", api_key)
            .query(&[("q", query), ("pageSize", page_size.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !resp.status().is_success() {
            return Err(api_error("NewsAPI", resp).await);
        }

        let parsed: NewsResponse = resp.json().await.map_err(|e| transport_error(&e))?;
        Ok(parsed.into_results(limit))
    }

    fn name(&self) -> &str {
        "NewsAPI"
    }
}

impl NewsResponse {
    /// Removed or untitled articles are skipped
    fn into_results(self, limit: usize) -> SearchResults {
        let hits = self
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title.filter(|t| !t.trim().is_empty() && t != "[Removed]")?;
                Some(SearchHit::new(
                    title,
                    a.url.unwrap_or_default(),
                    a.description.unwrap_or_default(),
                ))
            })
            .take(limit)
            .collect();

        SearchResults { answer: None, hits }
    }
}
