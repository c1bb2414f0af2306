//! Service Kit - Agent Tools
//!
//! Tools that implement `jaervice_core::Tool` on top of the search backends.

mod headlines;
mod news_search;
mod render;
mod web_search;
mod wikipedia;

pub use headlines::NewsHeadlinesTool;
pub use news_search::NewsSearchTool;
pub use render::{NO_NEWS, NO_WIKIPEDIA_RESULT, render_digest, render_encyclopedia, render_headlines};
pub use web_search::WebSearchTool;
pub use wikipedia::WikipediaTool;

use jaervice_core::{ToolCall, ToolError};

/// The single free-text argument every search tool takes
pub(crate) fn query_arg(call: &ToolCall) -> Result<&str, ToolError> {
    call.str_arg("query")
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments("query must be a non-empty string".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_arg() {
        let call = ToolCall::new("1", "web_search").with_argument("query", "  rust  ");
        assert_eq!(query_arg(&call).unwrap(), "rust");

        let blank = ToolCall::new("2", "web_search").with_argument("query", " ");
        assert!(matches!(query_arg(&blank), Err(ToolError::InvalidArguments(_))));

        let numeric = ToolCall::new("3", "web_search").with_argument("query", 42);
        assert!(query_arg(&numeric).is_err());
    }
}
