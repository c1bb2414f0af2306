//! Wikipedia lookup tool

use std::sync::Arc;

use async_trait::async_trait;
use jaervice_core::{ParameterSchema, Tool, ToolCall, ToolError, ToolSchema};

use super::{query_arg, render_encyclopedia};
use crate::backend::SearchBackend;

pub const NAME: &str = "wikipedia";

/// Pages returned per lookup
pub const TOP_K: usize = 2;

pub struct WikipediaTool {
    backend: Arc<dyn SearchBackend>,
}

impl WikipediaTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Search Wikipedia for encyclopedic information about a topic. Use this for \
                          factual, historical, or general knowledge questions."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "query",
                "The topic to search on Wikipedia",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        let query = query_arg(call)?;
        let results = self.backend.search(query, TOP_K).await?;
        Ok(render_encyclopedia(&results))
    }
}
