//! Wikipedia (MediaWiki action API) client

use async_trait::async_trait;
use jaervice_core::ToolError;
use reqwest::Client;
use serde::Deserialize;

use super::{SearchBackend, SearchHit, SearchResults, api_error, transport_error};

pub const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Extracts longer than this are cut
pub const MAX_EXTRACT_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    /// Search rank from the generator
    #[serde(default)]
    index: u32,
    #[serde(default)]
    missing: bool,
}

pub struct WikipediaClient {
    http: Client,
    endpoint: String,
}

impl WikipediaClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            endpoint: WIKIPEDIA_URL.into(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchBackend for WikipediaClient {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchResults, ToolError> {
        tracing::debug!(query, "Wikipedia search");

        let limit_param = limit.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", limit_param.as_str()),
                ("prop", "extracts|info"),
                ("inprop", "url"),
                ("explaintext", "1"),
                ("exintro", "1"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !resp.status().is_success() {
            return Err(api_error("Wikipedia", resp).await);
        }

        let parsed: QueryResponse = resp.json().await.map_err(|e| transport_error(&e))?;
        Ok(parsed.into_results(limit))
    }

    fn name(&self) -> &str {
        "Wikipedia"
    }
}

impl QueryResponse {
    fn into_results(self, limit: usize) -> SearchResults {
        let mut pages: Vec<Page> = self
            .query
            .map(|q| q.pages)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.missing)
            .collect();
        pages.sort_by_key(|p| p.index);

        let hits = pages
            .into_iter()
            .take(limit)
            .map(|p| {
                let extract = truncate_chars(p.extract.as_deref().unwrap_or_default(), MAX_EXTRACT_CHARS);
                SearchHit::new(p.title, p.fullurl.unwrap_or_default(), extract)
            })
            .collect();

        SearchResults { answer: None, hits }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.trim().chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_sorted_by_rank() {
        let body = r#"{
            "batchcomplete": true,
            "query": {"pages": [
                {"pageid": 2, "title": "Ferris (crab)", "index": 2, "extract": "A crab.", "fullurl": "https://en.wikipedia.org/wiki/Ferris"},
                {"pageid": 1, "title": "Rust (programming language)", "index": 1, "extract": "Rust is a language.", "fullurl": "https://en.wikipedia.org/wiki/Rust"},
                {"pageid": 3, "title": "Rust (fungus)", "index": 3, "extract": "A plant disease."}
            ]}
        }"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        let results = parsed.into_results(2);

        assert_eq!(results.hits.len(), 2);
        assert_eq!(results.hits[0].title, "Rust (programming language)");
        assert_eq!(results.hits[1].snippet, "A crab.");
    }

    #[test]
    fn test_no_query_block_is_empty() {
        let parsed: QueryResponse = serde_json::from_str(r#"{"batchcomplete": true}"#).unwrap();
        assert!(parsed.into_results(2).is_empty());
    }

    #[test]
    fn test_extract_is_capped() {
        let long = "é".repeat(MAX_EXTRACT_CHARS + 50);
        assert_eq!(truncate_chars(&long, MAX_EXTRACT_CHARS).chars().count(), MAX_EXTRACT_CHARS);
    }
}
