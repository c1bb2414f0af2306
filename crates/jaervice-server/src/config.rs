//! Server configuration

use anyhow::{Context, Result};

pub const DEFAULT_PORT: &str = "3001";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `BIND_ADDR` wins over `PORT`; `CORS_ORIGIN` defaults to the local web UI
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| {
            let port = non_empty("PORT").unwrap_or_else(|| DEFAULT_PORT.into());
            format!("0.0.0.0:{port}")
        });

        Self {
            bind_addr,
            cors_origin: non_empty("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into()),
        }
    }

    pub fn cors_header(&self) -> Result<axum::http::HeaderValue> {
        axum::http::HeaderValue::from_str(&self.cors_origin)
            .with_context(|| format!("CORS_ORIGIN is not a valid header value: {:?}", self.cors_origin))
    }
}
