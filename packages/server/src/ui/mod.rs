//! HTTP / WebSocket surface of the relay server.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::{Server, ServerConfig, build_router};
