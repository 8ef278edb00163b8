//! `FrameSource` implementations.

pub mod websocket;

pub use websocket::WebSocketFrameSource;
