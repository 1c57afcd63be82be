use tracing::info;

use crate::models::UserEventMessage;
use crate::session::SessionBroker;

/// Handle UserEventMessage
pub async fn handle_user_event_message(
    broker: &SessionBroker,
    session_id: &str,
    user_msg: &UserEventMessage,
) {
    info!(
        "User event received from session {}: userId={}, username={}",
        session_id, user_msg.user_id, user_msg.username
    );

    broker.apply_user_event(session_id, user_msg).await;
}
