//! Tool configuration

use jaervice_core::{AgentError, Result};

pub const DEFAULT_MAX_RESULTS: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Credentials and limits for the search tools.
///
/// Missing keys are allowed; the affected tool reports it when called.
#[derive(Clone)]
pub struct ToolsConfig {
    pub tavily_api_key: Option<String>,
    pub news_api_key: Option<String>,
    /// Hits per web/news query
    pub max_results: usize,
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            news_api_key: None,
            max_results: DEFAULT_MAX_RESULTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ToolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsConfig")
            .field("tavily_api_key", &self.tavily_api_key.as_ref().map(|_| "<set>"))
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "<set>"))
            .field("max_results", &self.max_results)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ToolsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `TAVILY_API_KEY`, `NEWS_API_KEY`, `TOOL_MAX_RESULTS` and `TOOL_TIMEOUT_SECS`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key = |name: &str| lookup(name).map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        let mut config = Self {
            tavily_api_key: key("TAVILY_API_KEY"),
            news_api_key: key("NEWS_API_KEY"),
            ..Self::default()
        };

        if let Some(raw) = lookup("TOOL_MAX_RESULTS") {
            config.max_results = positive(&raw)
                .ok_or_else(|| AgentError::Config(format!("TOOL_MAX_RESULTS: bad value {raw:?}")))?;
        }
        if let Some(raw) = lookup("TOOL_TIMEOUT_SECS") {
            config.timeout_secs = positive(&raw)
                .ok_or_else(|| AgentError::Config(format!("TOOL_TIMEOUT_SECS: bad value {raw:?}")))?;
        }

        Ok(config)
    }
}

fn positive<T: std::str::FromStr + PartialOrd + Default>(raw: &str) -> Option<T> {
    raw.trim().parse().ok().filter(|n| *n > T::default())
}
