use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserEventMessage {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContentChangeMessage {
    #[serde(default)]
    pub content: String,
}

/// Inbound client message, tagged by its `type` field. Frames with an
/// unknown type fail to parse and are dropped by the socket loop.
#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ReceivedMessage {
    #[serde(rename = "user-event")]
    UserEvent(UserEventMessage),
    #[serde(rename = "content-change")]
    ContentChange(ContentChangeMessage),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PresencePayload {
    pub users: BTreeMap<String, String>,
    pub user_activity: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    pub editor_content: String,
    pub user_activity: Vec<String>,
}

/// Outbound broadcast message: `{"type": ..., "data": {...}}` on the wire.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum SendMessage {
    #[serde(rename = "user-event")]
    UserEvent(PresencePayload),
    #[serde(rename = "content-change")]
    ContentChange(ContentPayload),
}
