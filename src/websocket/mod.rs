pub mod handler;
pub mod msg_content_change_handler;
pub mod msg_user_event_handler;
