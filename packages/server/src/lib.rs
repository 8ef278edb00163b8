//! Roomcast relay server.
//!
//! Clients connect over WebSocket, join named rooms and exchange short text
//! messages with the other members of each room. All chat state lives in a
//! single relay loop ([`relay::RelayLoop`]); connection tasks only forward
//! frames to it and drain frames from it.

pub mod domain;
pub mod infrastructure;
pub mod relay;
pub mod ui;
pub mod usecase;
