//! Command-line flags

use clap::Parser;
use jaervice_core::{AgentConfig, ThreadId, session::DEFAULT_THREAD_ID};

/// Chat with Jaervice from the terminal
#[derive(Debug, Parser)]
#[command(name = "jaervice", version, about = "Chat with Jaervice from the terminal")]
pub struct Cli {
    /// Conversation thread to use
    #[arg(short, long, default_value = DEFAULT_THREAD_ID)]
    pub thread: String,

    /// Model to use (overrides GROQ_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature (overrides GROQ_TEMPERATURE)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Model round trips allowed per turn (overrides MAX_TOOL_ROUND_TRIPS)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_round_trips: Option<u16>,

    /// Chat without search tools
    #[arg(long)]
    pub no_tools: bool,
}

impl Cli {
    /// Flags win over the environment
    pub fn apply(&self, config: &mut AgentConfig) {
        if let Some(model) = &self.model {
            config.generation.model.clone_from(model);
        }
        if let Some(temperature) = self.temperature {
            config.generation.temperature = temperature;
        }
        if let Some(max) = self.max_round_trips {
            config.max_round_trips = usize::from(max);
        }
    }

    pub fn thread_id(&self) -> ThreadId {
        ThreadId::or_default(Some(self.thread.as_str()))
    }
}
