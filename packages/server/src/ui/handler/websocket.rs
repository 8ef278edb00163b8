//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{infrastructure::frame_source::WebSocketFrameSource, ui::state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the relay drops the sending half (the connection was
/// removed) or when the peer is gone. A Close frame is sent on the way out.
///
/// # Arguments
///
/// * `rx` - Channel receiver for encoded frames from the relay
/// * `sender` - WebSocket sink to send frames to this client
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(frame.into())).await {
                tracing::debug!("WebSocket write failed: {}", e);
                return;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // The relay loop assigns the id and starts the reader.
    if let Err(e) = state
        .relay
        .accept(Box::new(WebSocketFrameSource::new(receiver)), tx)
    {
        tracing::warn!("Refusing WebSocket connection: {}", e);
        return;
    }

    if let Err(e) = pusher_loop(rx, sender).await {
        tracing::error!("WebSocket writer task failed: {}", e);
    }
}
