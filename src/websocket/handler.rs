use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::models::ReceivedMessage;
use crate::session::SessionBroker;
use crate::websocket::msg_content_change_handler::handle_content_change_message;
use crate::websocket::msg_user_event_handler::handle_user_event_message;

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(broker): State<Arc<SessionBroker>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, broker))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, broker: Arc<SessionBroker>) {
    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Outbound frames are queued on a channel; the broker fans broadcasts
    // out into it while the writer task below owns the socket sink.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let session_id = broker.register(tx).await;

    info!("WebSocket connection established with session_id: {}", session_id);

    // Writer task: drain queued frames into the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(frame).await.is_err() {
                break;
            }
        }
    });

    // Reader task: parse inbound text frames and dispatch by message type.
    let reader_broker = broker.clone();
    let reader_session_id = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(Message::Text(msg))) = receiver.next().await {
            // Parse the incoming message as JSON
            let json_msg: ReceivedMessage = match serde_json::from_str(&msg) {
                Ok(json_msg) => json_msg,
                Err(e) => {
                    error!(
                        "Dropping unparseable message from session {}: {}",
                        reader_session_id, e
                    );
                    continue;
                }
            };

            // Handle different message types
            match json_msg {
                ReceivedMessage::UserEvent(user_msg) => {
                    handle_user_event_message(&reader_broker, &reader_session_id, &user_msg).await;
                }
                ReceivedMessage::ContentChange(content_msg) => {
                    handle_content_change_message(&reader_broker, &reader_session_id, &content_msg)
                        .await;
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    broker.disconnect(&session_id).await;
    info!("WebSocket connection terminated for session_id: {}", session_id);
}
