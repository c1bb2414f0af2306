//! Recent news search tool

use std::sync::Arc;

use async_trait::async_trait;
use jaervice_core::{ParameterSchema, Tool, ToolCall, ToolError, ToolSchema};

use super::{query_arg, render_digest};
use crate::backend::SearchBackend;

pub const NAME: &str = "news_search";

pub struct NewsSearchTool {
    backend: Arc<dyn SearchBackend>,
    max_results: usize,
}

impl NewsSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>, max_results: usize) -> Self {
        Self { backend, max_results }
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Search for recent news articles on a specific topic. Use this when the user \
                          asks for news, current events, or recent updates."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "query",
                "The news topic or query to search for",
            )],
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
    use crate::backend::MockSearchBackend;

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let backend = Arc::new(MockSearchBackend::failing(ToolError::Api {
            service: "Tavily".into(),
            status: 432,
            message: "plan limit".into(),
        }));
        let tool = NewsSearchTool::new(backend, 3);

        let call = ToolCall::new("n1", NAME).with_argument("query", "elections");
        let err = tool.execute(&call).await.unwrap_err();
        assert_eq!(err.to_string(), "Tavily returned 432: plan limit");
    }

    #[tokio::test]
    async fn test_no_results() {
        let tool = NewsSearchTool::new(Arc::new(MockSearchBackend::empty()), 3);
        let call = ToolCall::new("n2", NAME).with_argument("query", "zzz");
        assert_eq!(tool.execute(&call).await.unwrap(), "No results found for \"zzz\".");
    }
}
