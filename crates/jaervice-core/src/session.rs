//! Session Management
//!
//! One [`Session`] per thread id, kept in memory for the life of the process.
//! A session is checked out for a whole turn through an owned per-thread lock,
//! so two turns on the same thread never interleave while different threads
//! proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::message::Conversation;

/// Thread id used when the caller supplies none
pub const DEFAULT_THREAD_ID: &str = "default-session";

/// Conversation thread identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Use `raw` when it has content, the default thread otherwise
    pub fn or_default(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(Self::default, Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self(DEFAULT_THREAD_ID.into())
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversation state for one thread
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: ThreadId,

    /// Conversation history
    pub conversation: Conversation,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,

    /// Completed or failed turns
    pub turns: usize,
}

impl Session {
    /// Create an empty session
    pub fn new(id: ThreadId) -> Self {
        let now = Utc::now();
        Self {
            id,
            conversation: Conversation::new(),
            created_at: now,
            updated_at: now,
            turns: 0,
        }
    }

    /// Record the end of a turn
    pub fn finish_turn(&mut self) {
        self.turns += 1;
        self.updated_at = Utc::now();
    }

    /// Message count
    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }
}

/// Exclusive access to one session for the duration of a turn
pub type SessionGuard = OwnedMutexGuard<Session>;

/// In-memory session store, keyed by thread id
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ThreadId, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session for `id`, creating it on first reference.
    /// Waits (FIFO) while another turn holds the same thread.
    pub async fn checkout(&self, id: &ThreadId) -> SessionGuard {
        self.slot(id).await.lock_owned().await
    }

    async fn slot(&self, id: &ThreadId) -> Arc<Mutex<Session>> {
        if let Some(slot) = self.sessions.read().await.get(id) {
            return Arc::clone(slot);
        }

        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(thread_id = %id, "Creating session");
            Arc::new(Mutex::new(Session::new(id.clone())))
        });
        Arc::clone(slot)
    }

    /// Copy of a session, waiting for any in-flight turn on it
    pub async fn snapshot(&self, id: &ThreadId) -> Option<Session> {
        let slot = self.sessions.read().await.get(id).cloned()?;
        let session = slot.lock().await;
        Some(session.clone())
    }

    /// Forget a thread. A turn already holding it finishes on the detached copy.
    pub async fn remove(&self, id: &ThreadId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Known thread ids, sorted
    pub async fn thread_ids(&self) -> Vec<ThreadId> {
        let mut ids: Vec<_> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Check if empty
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use std::time::Duration;

    #[test]
    fn test_thread_id_defaults() {
        assert_eq!(ThreadId::default().as_str(), DEFAULT_THREAD_ID);
        assert_eq!(ThreadId::or_default(None).as_str(), DEFAULT_THREAD_ID);
        assert_eq!(ThreadId::or_default(Some("   ")).as_str(), DEFAULT_THREAD_ID);
        assert_eq!(ThreadId::or_default(Some(" abc ")).as_str(), "abc");
    }

    #[tokio::test]
    async fn test_checkout_creates_and_keeps_state() {
        let store = SessionStore::new();
        let id = ThreadId::new("t1");

        {
            let mut session = store.checkout(&id).await;
            session.conversation.push(Message::user("hello"));
            session.finish_turn();
        }

        let snapshot = store.snapshot(&id).await.unwrap();
        assert_eq!(snapshot.message_count(), 1);
        assert_eq!(snapshot.turns, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.snapshot(&ThreadId::new("other")).await.is_none());
    }

    #[tokio::test]
    async fn test_same_thread_is_exclusive() {
        let store = Arc::new(SessionStore::new());
        let id = ThreadId::new("shared");

        let guard = store.checkout(&id).await;

        let waiter = {
            let store = Arc::clone(&store);
            let id = id.clone();
            tokio::spawn(async move {
                let mut session = store.checkout(&id).await;
                session.conversation.push(Message::user("second"));
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        let mut guard = guard;
        guard.conversation.push(Message::user("first"));
        drop(guard);

        waiter.await.unwrap();
        let session = store.snapshot(&id).await.unwrap();
        let contents: Vec<_> = session
            .conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_other_threads_are_not_blocked() {
        let store = SessionStore::new();
        let _held = store.checkout(&ThreadId::new("a")).await;

        let other = tokio::time::timeout(
            Duration::from_millis(100),
            store.checkout(&ThreadId::new("b")),
        )
        .await;
        assert!(other.is_ok());
        assert_eq!(store.thread_ids().await, vec![ThreadId::new("a"), ThreadId::new("b")]);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new();
        drop(store.checkout(&ThreadId::new("gone")).await);
        assert!(store.remove(&ThreadId::new("gone")).await);
        assert!(!store.remove(&ThreadId::new("gone")).await);
        assert!(store.is_empty().await);
    }
}
