//! Headlines tool backed by NewsAPI

use std::sync::Arc;

use async_trait::async_trait;
use jaervice_core::{ParameterSchema, Tool, ToolCall, ToolError, ToolSchema};

use super::{query_arg, render_headlines};
use crate::backend::SearchBackend;

pub const NAME: &str = "news_headlines";

/// Returns `title: url` lines for the newest matching articles
pub struct NewsHeadlinesTool {
    backend: Arc<dyn SearchBackend>,
    max_results: usize,
}

impl NewsHeadlinesTool {
    pub fn new(backend: Arc<dyn SearchBackend>, max_results: usize) -> Self {
        Self { backend, max_results }
    }
}

#[async_trait]
impl Tool for NewsHeadlinesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Fetch news headlines with links from NewsAPI.".into(),
            parameters: vec![ParameterSchema::required_string("query", "Keywords to look for")],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        let query = query_arg(call)?;
        let results = self.backend.search(query, self.max_results).await?;
        Ok(render_headlines(&results))
    }
}
