//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Failures that end a chat turn
#[derive(Error, Debug)]
pub enum AgentError {
    /// The model client failed (after any retries)
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Tool round-trip cap reached in the dispatch loop
    #[error("Tool loop exceeded: {0} model round trips without a final answer")]
    LoopExceeded(usize),

    /// The transcript handed to the loop cannot start a turn
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The task running the turn panicked or was cancelled
    #[error("Turn aborted: {0}")]
    Aborted(String),
}

impl AgentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Model(ModelError::Auth(_)) => {
                "Authentication with the AI service failed. Please check your API key.".into()
            }
            Self::Model(ModelError::RateLimited(_)) => {
                "You've made too many requests. Please wait a moment.".into()
            }
            Self::Model(e) if e.is_transient() => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            Self::Model(e) => format!("The AI service encountered an error: {e}"),
            Self::LoopExceeded(_) => {
                "The request took too many tool calls to answer. Please try a simpler query.".into()
            }
            Self::InvalidTranscript(_) | Self::Config(_) | Self::Aborted(_) => "An unexpected error occurred.".into(),
        }
    }
}

/// Model client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Provider unreachable or answering 5xx
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Provider throttled the request
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Missing or rejected credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Provider rejected the request as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider answered with something we cannot decode
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Retry bound reached on a transient failure
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<ModelError>,
    },
}

impl ModelError {
    /// Check if error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout(_) | Self::RateLimited(_)
        )
    }

    /// Retryable, or a retry-exhausted wrapper around a retryable error
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RetriesExhausted { last, .. } => last.is_transient(),
            other => other.is_retryable(),
        }
    }
}

/// Tool adapter errors. Never abort a turn; the registry turns them into tool-result text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Network failure talking to the backing service
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// Arguments missing or of the wrong shape
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// No API key configured for the backing service
    #[error("{0} API key missing")]
    MissingCredentials(String),

    /// Backing service answered with an error status
    #[error("{service} returned {status}: {message}")]
    Api {
        service: String,
        status: u16,
        message: String,
    },

    /// Backing service answered with an undecodable body
    #[error("unreadable response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ModelError::Unavailable("502".into()).is_retryable());
        assert!(ModelError::Timeout("slow".into()).is_retryable());
        assert!(ModelError::RateLimited("429".into()).is_retryable());
        assert!(!ModelError::Auth("bad key".into()).is_retryable());
        assert!(!ModelError::InvalidRequest("schema".into()).is_retryable());

        let exhausted = ModelError::RetriesExhausted {
            attempts: 3,
            last: Box::new(ModelError::Unavailable("503".into())),
        };
        assert!(!exhausted.is_retryable());
        assert!(exhausted.is_transient());
    }

    #[test]
    fn test_user_message() {
        let err = AgentError::LoopExceeded(10);
        assert!(err.user_message().contains("too many tool calls"));

        let err = AgentError::from(ModelError::Auth("401".into()));
        assert!(err.user_message().contains("API key"));
    }

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::MissingCredentials("NewsAPI".into());
        assert_eq!(err.to_string(), "NewsAPI API key missing");
    }
}
