//! Session broker: the state machine behind the shared document session.
//!
//! Owns the connection registry, user registry, activity log and document
//! state behind a single mutex. Every transport event takes the lock for
//! the whole read-mutate-broadcast step, so events apply as a strictly
//! serialized sequence and a broadcast can never observe a half-applied
//! registry.

use axum::extract::ws::Message;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::{
    ContentChangeMessage, ContentPayload, PresencePayload, SendMessage, UserEventMessage,
};

use super::activity::ActivityLog;
use super::connections::{ConnectionRegistry, ConnectionSender};
use super::document::DocumentState;
use super::users::UserRegistry;

/// Counters reported by the diagnostics endpoint.
pub struct BrokerStats {
    pub connections: u32,
    pub users: u32,
    pub activity_entries: u32,
    pub document_bytes: u64,
}

struct BrokerState {
    connections: ConnectionRegistry,
    users: UserRegistry,
    activity: ActivityLog,
    document: DocumentState,
}

impl BrokerState {
    /// Serialize once, then attempt delivery to every registered
    /// connection. A failed send is logged and skipped; the entry is only
    /// ever removed by its own close event.
    fn broadcast(&self, payload: &SendMessage) {
        let text = serde_json::to_string(payload).unwrap();
        for (session_id, sender) in self.connections.iter() {
            if sender.send(Message::Text(text.clone())).is_err() {
                warn!("Failed to deliver broadcast to session {}", session_id);
            }
        }
    }

    fn presence_payload(&self) -> SendMessage {
        SendMessage::UserEvent(PresencePayload {
            users: self.users.snapshot(),
            user_activity: self.activity.snapshot(),
        })
    }
}

/// Owns every piece of shared session state. Handed by reference to the
/// transport layer; there are no ambient globals.
pub struct SessionBroker {
    state: Mutex<BrokerState>,
}

impl SessionBroker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BrokerState {
                connections: ConnectionRegistry::new(),
                users: UserRegistry::new(),
                activity: ActivityLog::new(),
                document: DocumentState::new(),
            }),
        }
    }

    /// Register a newly opened connection and mint its session id. No
    /// broadcast: presence is only announced by the client's first
    /// user-event message.
    pub async fn register(&self, sender: ConnectionSender) -> String {
        let mut state = self.state.lock().await;
        let session_id = state.connections.register(sender);
        info!("{} connected", session_id);
        session_id
    }

    /// A client announced presence. The user is registered under the id
    /// the payload supplied (not the session's own id), the join is
    /// narrated, and the updated presence is fanned out to everyone.
    pub async fn apply_user_event(&self, session_id: &str, msg: &UserEventMessage) {
        let mut state = self.state.lock().await;
        state.connections.bind_user(session_id, &msg.user_id);
        state.users.upsert(&msg.user_id, &msg.username);
        state
            .activity
            .append(format!("{} joined to edit the document", msg.username));
        let payload = state.presence_payload();
        state.broadcast(&payload);
    }

    /// A client pushed new document content. The stored value is fully
    /// replaced and the result fanned out to everyone, sender included.
    pub async fn apply_content_change(&self, _session_id: &str, msg: &ContentChangeMessage) {
        let mut state = self.state.lock().await;
        state.document.set(&msg.content);
        let payload = SendMessage::ContentChange(ContentPayload {
            editor_content: state.document.get().to_string(),
            user_activity: state.activity.snapshot(),
        });
        state.broadcast(&payload);
    }

    /// A connection closed. Retires the user record the session announced
    /// (if any), narrates the departure and broadcasts the updated presence
    /// to the remaining connections. The removal happens before the
    /// broadcast so the departed user never appears in the outgoing
    /// snapshot. No-op if the session is already gone.
    pub async fn disconnect(&self, session_id: &str) {
        let mut state = self.state.lock().await;
        let Some(entry) = state.connections.unregister(session_id) else {
            return;
        };
        info!("{} disconnected", session_id);

        // A session that never announced has no user record; its departure
        // is narrated with an empty name.
        let username = entry
            .user_id
            .as_deref()
            .and_then(|user_id| state.users.display_name(user_id))
            .unwrap_or_default()
            .to_string();
        if let Some(user_id) = entry.user_id.as_deref() {
            state.users.remove(user_id);
        }
        state
            .activity
            .append(format!("{} left the document", username));
        let payload = state.presence_payload();
        state.broadcast(&payload);
    }

    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    pub async fn stats(&self) -> BrokerStats {
        let state = self.state.lock().await;
        BrokerStats {
            connections: state.connections.len() as u32,
            users: state.users.len() as u32,
            activity_entries: state.activity.len() as u32,
            document_bytes: state.document.byte_len() as u64,
        }
    }
}

impl Default for SessionBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn client() -> (ConnectionSender, UnboundedReceiver<Message>) {
        mpsc::unbounded_channel()
    }

    fn recv_json(rx: &mut UnboundedReceiver<Message>) -> Value {
        match rx.try_recv().expect("expected a broadcast frame") {
            Message::Text(text) => serde_json::from_str(&text).expect("broadcast frame is JSON"),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    fn user_event(user_id: &str, username: &str) -> UserEventMessage {
        UserEventMessage {
            user_id: user_id.to_string(),
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn user_event_fans_out_presence_to_every_connection() {
        let broker = SessionBroker::new();
        let (tx_a, mut rx_a) = client();
        let (tx_b, mut rx_b) = client();
        let a = broker.register(tx_a).await;
        broker.register(tx_b).await;

        broker.apply_user_event(&a, &user_event("u1", "Alice")).await;

        let expected = json!({
            "type": "user-event",
            "data": {
                "users": {"u1": "Alice"},
                "userActivity": ["Alice joined to edit the document"],
            }
        });
        assert_eq!(recv_json(&mut rx_a), expected);
        assert_eq!(recv_json(&mut rx_b), expected);
    }

    #[tokio::test]
    async fn content_change_replaces_content_byte_for_byte() {
        let broker = SessionBroker::new();
        let (tx_a, mut rx_a) = client();
        let a = broker.register(tx_a).await;

        broker.apply_user_event(&a, &user_event("u1", "Alice")).await;
        recv_json(&mut rx_a);

        broker
            .apply_content_change(
                &a,
                &ContentChangeMessage {
                    content: "hello".to_string(),
                },
            )
            .await;

        assert_eq!(
            recv_json(&mut rx_a),
            json!({
                "type": "content-change",
                "data": {
                    "editorContent": "hello",
                    "userActivity": ["Alice joined to edit the document"],
                }
            })
        );
        assert_eq!(broker.stats().await.document_bytes, 5);
    }

    #[tokio::test]
    async fn disconnect_retires_the_user_before_broadcasting() {
        let broker = SessionBroker::new();
        let (tx_a, mut rx_a) = client();
        let (tx_b, mut rx_b) = client();
        let a = broker.register(tx_a).await;
        broker.register(tx_b).await;

        broker.apply_user_event(&a, &user_event("u1", "Alice")).await;
        recv_json(&mut rx_a);
        recv_json(&mut rx_b);

        broker.disconnect(&a).await;

        assert_eq!(
            recv_json(&mut rx_b),
            json!({
                "type": "user-event",
                "data": {
                    "users": {},
                    "userActivity": [
                        "Alice joined to edit the document",
                        "Alice left the document",
                    ],
                }
            })
        );
        // The departed connection was removed before the fan-out.
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_before_announce_narrates_an_empty_name() {
        let broker = SessionBroker::new();
        let (tx_a, _rx_a) = client();
        let (tx_b, mut rx_b) = client();
        let a = broker.register(tx_a).await;
        broker.register(tx_b).await;

        broker.disconnect(&a).await;

        assert_eq!(
            recv_json(&mut rx_b),
            json!({
                "type": "user-event",
                "data": {
                    "users": {},
                    "userActivity": [" left the document"],
                }
            })
        );
    }

    #[tokio::test]
    async fn double_disconnect_is_a_noop() {
        let broker = SessionBroker::new();
        let (tx_a, _rx_a) = client();
        let (tx_b, mut rx_b) = client();
        let a = broker.register(tx_a).await;
        broker.register(tx_b).await;

        broker.disconnect(&a).await;
        recv_json(&mut rx_b);

        broker.disconnect(&a).await;
        assert!(rx_b.try_recv().is_err());
        assert_eq!(broker.connection_count().await, 1);
    }

    #[tokio::test]
    async fn re_announcing_appends_a_fresh_join_entry() {
        let broker = SessionBroker::new();
        let (tx_a, mut rx_a) = client();
        let a = broker.register(tx_a).await;

        broker.apply_user_event(&a, &user_event("u1", "Alice")).await;
        recv_json(&mut rx_a);
        broker.apply_user_event(&a, &user_event("u1", "Alice")).await;

        let second = recv_json(&mut rx_a);
        assert_eq!(
            second["data"]["userActivity"],
            json!([
                "Alice joined to edit the document",
                "Alice joined to edit the document",
            ])
        );
        // Still a single registered user.
        assert_eq!(second["data"]["users"], json!({"u1": "Alice"}));
    }

    #[tokio::test]
    async fn broadcast_continues_past_closed_receivers() {
        let broker = SessionBroker::new();
        let (tx_a, rx_a) = client();
        let (tx_b, mut rx_b) = client();
        let a = broker.register(tx_a).await;
        broker.register(tx_b).await;
        drop(rx_a);

        broker
            .apply_content_change(
                &a,
                &ContentChangeMessage {
                    content: "still delivered".to_string(),
                },
            )
            .await;

        assert_eq!(
            recv_json(&mut rx_b)["data"]["editorContent"],
            json!("still delivered")
        );
        // The stale connection is not removed by a failed send.
        assert_eq!(broker.connection_count().await, 2);
    }

    #[tokio::test]
    async fn registry_size_tracks_opens_minus_closes() {
        let broker = SessionBroker::new();
        let mut sessions = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = client();
            sessions.push((broker.register(tx).await, rx));
        }
        assert_eq!(broker.connection_count().await, 3);

        broker.disconnect(&sessions[0].0).await;
        broker.disconnect(&sessions[1].0).await;
        broker.disconnect(&sessions[1].0).await;
        assert_eq!(broker.connection_count().await, 1);
    }
}
