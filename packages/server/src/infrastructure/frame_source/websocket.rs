//! FrameSource over the read half of an axum WebSocket.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitStream, StreamExt};

use crate::domain::{FrameSource, TransportError};

pub struct WebSocketFrameSource {
    stream: SplitStream<WebSocket>,
}

impl WebSocketFrameSource {
    pub fn new(stream: SplitStream<WebSocket>) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl FrameSource for WebSocketFrameSource {
    async fn receive_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            let msg = match self.stream.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => return Err(TransportError::Read(e.to_string())),
                None => return Err(TransportError::Closed),
            };

            match msg {
                Message::Text(text) => return Ok(text.as_str().as_bytes().to_vec()),
                Message::Binary(data) => return Ok(data.to_vec()),
                Message::Close(_) => return Err(TransportError::Closed),
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => continue,
            }
        }
    }
}
