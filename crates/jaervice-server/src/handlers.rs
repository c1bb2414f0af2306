//! HTTP Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use jaervice_core::ThreadId;

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub thread_id: String,
    /// RFC 3339
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
    pub tools: Vec<String>,
}

/// Errors returned to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request body; never reaches the agent
    #[error("{0}")]
    Validation(String),

    /// The chat turn failed
    #[error("Failed to process message: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(error) => (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response(),
            Self::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to process message",
                    "details": details,
                })),
            )
                .into_response(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let agent = state.chatbot.agent();
    let provider_connected = agent.provider().health_check().await;

    Json(HealthResponse {
        status: "ok",
        message: "Jaervice backend is running",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
        tools: agent.tools().names(),
    })
}

/// Run one chat turn on the requested thread
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected chat body");
        ApiError::Validation(rejection.body_text())
    })?;

    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Message is required".into()))?;

    let thread_id = ThreadId::or_default(payload.thread_id.as_deref());

    let reply = state
        .chatbot
        .send(&thread_id, &message)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ChatResponse {
        response: reply.response,
        thread_id: reply.thread_id.to_string(),
        timestamp: reply.timestamp.to_rfc3339(),
    }))
}

/// Catch-all for unknown routes
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Endpoint not found" })))
}
