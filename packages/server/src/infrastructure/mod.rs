//! Infrastructure layer: wire format, codec and transport adapters.

pub mod codec;
pub mod dto;
pub mod frame_source;
pub mod message_pusher;
