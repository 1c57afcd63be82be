use tracing::info;

use crate::models::ContentChangeMessage;
use crate::session::SessionBroker;

/// Handle ContentChangeMessage
pub async fn handle_content_change_message(
    broker: &SessionBroker,
    session_id: &str,
    content_msg: &ContentChangeMessage,
) {
    info!(
        "Content change received from session {}: {} bytes",
        session_id,
        content_msg.content.len()
    );

    broker.apply_content_change(session_id, content_msg).await;
}
