//! Mock Search Backend
//!
//! For testing and demo purposes. Returns canned results without network access.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use jaervice_core::ToolError;

use super::{SearchBackend, SearchResults};

/// Mock backend with a fixed outcome and query recording
pub struct MockSearchBackend {
    name: String,
    outcome: Result<SearchResults, ToolError>,
    latency: Duration,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockSearchBackend {
    pub fn new(results: SearchResults) -> Self {
        Self {
            name: "MockSearch".into(),
            outcome: Ok(results),
            latency: Duration::ZERO,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Backend that finds nothing
    pub fn empty() -> Self {
        Self::new(SearchResults::default())
    }

    /// Backend that fails every query
    pub fn failing(error: ToolError) -> Self {
        Self {
            outcome: Err(error),
            ..Self::empty()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// `(query, limit)` pairs seen so far
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults, ToolError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((query.to_string(), limit));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.outcome.clone().map(|mut results| {
            results.hits.truncate(limit);
            results
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
