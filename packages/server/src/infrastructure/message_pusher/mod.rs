//! `MessagePusher` implementations.
//!
//! - `websocket`: channel-per-connection pusher feeding WebSocket writer tasks

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
