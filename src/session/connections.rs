use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Outbound frame channel for one client connection. The writer task that
/// owns the socket sink drains the receiving half.
pub type ConnectionSender = UnboundedSender<Message>;

/// One registered connection: its outbound channel and the user id this
/// session announced, if any.
pub struct ConnectionEntry {
    pub sender: ConnectionSender,
    pub user_id: Option<String>,
}

/// Registry of live connections, keyed by the server-minted session id.
#[derive(Default)]
pub struct ConnectionRegistry {
    entries: HashMap<String, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a new connection and mint its session id.
    pub fn register(&mut self, sender: ConnectionSender) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.entries.insert(
            session_id.clone(),
            ConnectionEntry {
                sender,
                user_id: None,
            },
        );
        session_id
    }

    /// Remove a connection. Returns the removed entry, or None if the
    /// session was not registered (double close).
    pub fn unregister(&mut self, session_id: &str) -> Option<ConnectionEntry> {
        self.entries.remove(session_id)
    }

    /// Record the user id this session announced. A later announce
    /// overwrites the binding.
    pub fn bind_user(&mut self, session_id: &str, user_id: &str) {
        if let Some(entry) = self.entries.get_mut(session_id) {
            entry.user_id = Some(user_id.to_string());
        }
    }

    pub fn user_for(&self, session_id: &str) -> Option<&str> {
        self.entries
            .get(session_id)
            .and_then(|entry| entry.user_id.as_deref())
    }

    /// Iterate (session id, outbound sender) pairs for broadcast fan-out.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConnectionSender)> {
        self.entries
            .iter()
            .map(|(session_id, entry)| (session_id.as_str(), &entry.sender))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
