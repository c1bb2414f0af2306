//! Jaervice HTTP Server
//!
//! Axum server exposing the chatbot to the web UI.

mod app;
mod config;
mod handlers;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jaervice_core::{Agent, AgentConfig, Chatbot, LlmProvider, SessionStore};
use jaervice_runtime::GroqConfig;
use jaervice_tools::ToolsConfig;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let agent_config = AgentConfig::from_env()?;
    let provider = jaervice_runtime::connect(GroqConfig::from_env()?)?;

    if provider.health_check().await {
        tracing::info!("✓ Connected to {}", provider.info().name);
    } else {
        tracing::warn!("⚠ Model provider not reachable - chat requests will fail");
        tracing::warn!("  Check GROQ_API_KEY and GROQ_BASE_URL");
    }

    let tools = jaervice_tools::default_registry(&ToolsConfig::from_env()?)?;
    tracing::info!("Registered {} tools", tools.len());

    tracing::info!(
        model = %agent_config.generation.model,
        max_round_trips = agent_config.max_round_trips,
        "Agent configured"
    );
    let agent = Agent::new(provider, Arc::new(tools), agent_config);
    let state = AppState::new(Chatbot::new(agent, Arc::new(SessionStore::new())));

    let server_config = ServerConfig::from_env();
    let app = app::router(state, server_config.cors_header()?);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;

    tracing::info!("🚀 Jaervice server running on http://{}", server_config.bind_addr);
    tracing::info!("  GET  /health    - Health check");
    tracing::info!("  POST /api/chat  - Send message");
    tracing::info!("  CORS origin: {}", server_config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
