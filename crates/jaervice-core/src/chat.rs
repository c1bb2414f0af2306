//! Chat service shared by the HTTP and terminal front ends.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::Instrument;

use crate::dispatch::Agent;
use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::session::{SessionStore, ThreadId};

/// Reply used when the model's final message is empty
pub const FALLBACK_REPLY: &str = "I'm not sure how to respond to that.";

/// Result of one chat turn
#[derive(Clone, Debug)]
pub struct ChatReply {
    pub thread_id: ThreadId,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub round_trips: usize,
    pub tool_calls: usize,
}

/// Agent plus per-thread session state
pub struct Chatbot {
    agent: Arc<Agent>,
    sessions: Arc<SessionStore>,
}

impl Chatbot {
    pub fn new(agent: Agent, sessions: Arc<SessionStore>) -> Self {
        Self {
            agent: Arc::new(agent),
            sessions,
        }
    }

    /// Send one user message on a thread and wait for the final reply.
    ///
    /// The turn runs on its own task holding the thread lock, so it reaches
    /// a final answer or an error even if the caller stops waiting.
    pub async fn send(&self, thread_id: &ThreadId, text: &str) -> Result<ChatReply> {
        let span = tracing::info_span!("chat_turn", thread_id = %thread_id);
        let turn = run_turn(
            Arc::clone(&self.agent),
            Arc::clone(&self.sessions),
            thread_id.clone(),
            text.to_string(),
        );

        match tokio::spawn(turn.instrument(span)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(thread_id = %thread_id, error = %e, "Chat turn task aborted");
                Err(AgentError::Aborted(e.to_string()))
            }
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }
}

async fn run_turn(
    agent: Arc<Agent>,
    sessions: Arc<SessionStore>,
    thread_id: ThreadId,
    text: String,
) -> Result<ChatReply> {
    let mut session = sessions.checkout(&thread_id).await;
    tracing::info!(user = %preview(&text), "User message");

    session.conversation.push(Message::user(text));
    let outcome = agent.run(&mut session.conversation).await;
    session.finish_turn();

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Chat turn failed");
            return Err(e);
        }
    };

    let response = if report.reply.trim().is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        report.reply
    };

    tracing::info!(
        ai = %preview(&response),
        round_trips = report.round_trips,
        tool_calls = report.tool_calls,
        "Turn complete"
    );

    Ok(ChatReply {
        thread_id,
        response,
        timestamp: Utc::now(),
        round_trips: report.round_trips,
        tool_calls: report.tool_calls,
    })
}

/// First 100 characters, for log lines
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(100).collect();
    if text.chars().nth(100).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::dispatch::AgentBuilder;
    use crate::error::ToolError;
    use crate::message::Role;
    use crate::mock::MockProvider;
    use crate::provider::ModelResponse;
    use crate::tool::{ParameterSchema, Tool, ToolCall, ToolSchema};

    /// Tool that takes a while to answer
    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "slow_search".into(),
                description: "Slow lookup".into(),
                parameters: vec![ParameterSchema::required_string("query", "Query")],
            }
        }

        async fn execute(&self, call: &ToolCall) -> std::result::Result<String, ToolError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(format!("found {}", call.str_arg("query").unwrap_or_default()))
        }
    }

    fn chatbot(provider: MockProvider) -> Chatbot {
        let agent = AgentBuilder::new().provider(Arc::new(provider)).build().unwrap();
        Chatbot::new(agent, Arc::new(SessionStore::new()))
    }

    #[tokio::test]
    async fn test_send_creates_thread() {
        let bot = chatbot(MockProvider::fixed("4"));
        let reply = bot.send(&ThreadId::default(), "What's 2+2?").await.unwrap();

        assert_eq!(reply.response, "4");
        assert_eq!(reply.thread_id.as_str(), "default-session");

        let session = bot.sessions().snapshot(&ThreadId::default()).await.unwrap();
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.turns, 1);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let bot = chatbot(MockProvider::scripted(vec![Ok(ModelResponse::text("  "))]));
        let reply = bot.send(&ThreadId::new("t"), "hello").await.unwrap();
        assert_eq!(reply.response, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_user_message() {
        let bot = chatbot(MockProvider::scripted(Vec::new()));
        let id = ThreadId::new("broken");

        assert!(bot.send(&id, "hello").await.is_err());

        let session = bot.sessions().snapshot(&id).await.unwrap();
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.turns, 1);
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(150);
        assert_eq!(preview(&long).len(), 103);
    }

    #[tokio::test]
    async fn test_abandoned_turn_still_completes() {
        let provider = MockProvider::scripted(vec![
            Ok(ModelResponse::tool_calls(vec![
                ToolCall::new("a", "slow_search").with_argument("query", "one"),
                ToolCall::new("b", "slow_search").with_argument("query", "two"),
            ])),
            Ok(ModelResponse::text("done")),
            Ok(ModelResponse::text("second")),
        ]);
        let agent = AgentBuilder::new()
            .provider(Arc::new(provider))
            .tool(SlowTool)
            .build()
            .unwrap();
        let bot = Chatbot::new(agent, Arc::new(SessionStore::new()));
        let id = ThreadId::new("impatient");

        // Caller gives up between the two tool calls
        let abandoned = tokio::time::timeout(Duration::from_millis(150), bot.send(&id, "hi")).await;
        assert!(abandoned.is_err());

        let reply = bot.send(&id, "again").await.unwrap();
        assert_eq!(reply.response, "second");

        let session = bot.sessions().snapshot(&id).await.unwrap();
        let messages = session.conversation.messages();
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Tool,
                Role::Assistant,
                Role::User,
                Role::Assistant,
            ]
        );
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("a"));
        assert_eq!(messages[3].tool_call_id.as_deref(), Some("b"));
        assert_eq!(messages[4].content, "done");
        assert_eq!(session.turns, 2);
    }
}
