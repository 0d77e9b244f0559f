//! Chat session storage.
//!
//! Sessions hold conversation history only. They are created lazily when a
//! request arrives without a known id and are never deleted: a finished
//! request leaves its transcript behind for the next message in the same
//! conversation.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

use kubeward_core::{SessionId, Timestamp};
use kubeward_llm::Message;

/// One conversation.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// Conversation messages, append-only.
    pub messages: Vec<Message>,
    /// When the session was created.
    pub created_at: Timestamp,
    /// When the session last saw a message.
    pub last_activity: Timestamp,
    /// Provider name serving this session, recorded on first use.
    pub provider: Option<String>,
    /// Model name serving this session, recorded on first use.
    pub model: Option<String>,
}

impl Session {
    fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
            provider: None,
            model: None,
        }
    }
}

/// In-memory session registry shared by all in-flight requests.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<SessionId, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a request's session: reuse the given id, or mint a new one.
    ///
    /// An unknown id is not an error; the session is created under that id so
    /// clients may pre-allocate ids.
    pub fn get_or_create(&self, id: Option<SessionId>) -> SessionId {
        let id = id.unwrap_or_default();
        self.sessions.entry(id.clone()).or_insert_with(|| {
            info!(session_id = %id, "Created session");
            Session::new(id.clone())
        });
        id
    }

    /// Append a message to a session's history.
    ///
    /// Missing sessions are created, keeping append infallible.
    pub fn append(&self, id: &SessionId, message: Message) {
        let mut session = self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()));
        session.messages.push(message);
        session.last_activity = Timestamp::now();
    }

    /// Clone a session's full history.
    #[must_use]
    pub fn history(&self, id: &SessionId) -> Vec<Message> {
        self.sessions
            .get(id)
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Record which provider and model serve this session.
    pub fn set_provider(&self, id: &SessionId, provider: &str, model: &str) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.provider.get_or_insert_with(|| provider.to_string());
            session.model.get_or_insert_with(|| model.to_string());
        }
    }

    /// Snapshot one session.
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.get(id).map(|s| s.clone())
    }

    /// Number of sessions ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
