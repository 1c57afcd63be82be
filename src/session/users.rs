use std::collections::BTreeMap;

/// Presence registry: display names keyed by the client-supplied user id.
/// Ordered so presence payloads serialize with a stable key order.
#[derive(Default)]
pub struct UserRegistry {
    users: BTreeMap<String, String>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
        }
    }

    /// Create or overwrite a user's display name. Idempotent at the
    /// registry level; the protocol layer treats every call as a fresh join.
    pub fn upsert(&mut self, user_id: &str, display_name: &str) {
        self.users
            .insert(user_id.to_string(), display_name.to_string());
    }

    /// Delete a user record. No-op if absent.
    pub fn remove(&mut self, user_id: &str) {
        self.users.remove(user_id);
    }

    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.users.get(user_id).map(String::as_str)
    }

    /// Presence snapshot for broadcast payloads. Contains only currently
    /// registered users.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.users.clone()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
