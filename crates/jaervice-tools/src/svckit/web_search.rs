//! General web search tool

use std::sync::Arc;

use async_trait::async_trait;
use jaervice_core::{ParameterSchema, Tool, ToolCall, ToolError, ToolSchema};

use super::{query_arg, render_digest};
use crate::backend::SearchBackend;

pub const NAME: &str = "web_search";

/// Searches the web and returns an answer plus the top hits
pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>, max_results: usize) -> Self {
        Self { backend, max_results }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Search the web for up-to-date information. Use this for questions about \
                          facts, products, prices, weather or anything that may have changed recently."
                .into(),
            parameters: vec![ParameterSchema::required_string("query", "The search query")],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        let query = query_arg(call)?;
        let results = self.backend.search(query, self.max_results).await?;
        Ok(render_digest(query, &results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockSearchBackend, SearchHit, SearchResults};

    #[tokio::test]
    async fn test_web_search_renders_digest() {
        let backend = Arc::new(MockSearchBackend::new(SearchResults {
            answer: Some("Paris".into()),
            hits: vec![SearchHit::new("France", "https://fr.example", "Capital: Paris")],
        }));
        let tool = WebSearchTool::new(backend.clone(), 3);

        let call = ToolCall::new("c1", NAME).with_argument("query", "capital of France");
        let out = tool.execute(&call).await.unwrap();

        assert!(out.starts_with("Answer: Paris"));
        assert!(out.contains("1. France"));
        assert_eq!(backend.queries(), vec![("capital of France".to_string(), 3)]);
    }

    #[test]
    fn test_schema_requires_query() {
        let tool = WebSearchTool::new(Arc::new(MockSearchBackend::empty()), 3);
        let schema = tool.schema();
        assert_eq!(schema.name, "web_search");
        assert!(tool.validate(&ToolCall::new("x", NAME)).is_err());
    }
}
