//! Jaervice terminal chat

mod cli;
mod repl;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jaervice_core::{Agent, AgentConfig, Chatbot, SessionStore, ToolRegistry};
use jaervice_runtime::GroqConfig;
use jaervice_tools::ToolsConfig;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut agent_config = AgentConfig::from_env()?;
    args.apply(&mut agent_config);

    let provider = jaervice_runtime::connect(GroqConfig::from_env()?)?;
    tracing::debug!("Using provider {}", provider.info().name);

    let tools = if args.no_tools {
        tracing::info!("Tools disabled");
        ToolRegistry::new()
    } else {
        jaervice_tools::default_registry(&ToolsConfig::from_env()?)?
    };
    tracing::info!(
        model = %agent_config.generation.model,
        tools = tools.len(),
        "Agent configured"
    );

    let agent = Agent::new(provider, Arc::new(tools), agent_config);
    let chatbot = Chatbot::new(agent, Arc::new(SessionStore::new()));

    repl::run(&chatbot, &args.thread_id()).await
}
