//! Application State

use std::sync::Arc;

use jaervice_core::Chatbot;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Agent, tools and per-thread sessions
    pub chatbot: Arc<Chatbot>,
}

impl AppState {
    pub fn new(chatbot: Chatbot) -> Self {
        Self {
            chatbot: Arc::new(chatbot),
        }
    }
}
