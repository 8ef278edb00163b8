//! Outbound half of the transport seam.
//!
//! The relay loop owns one `MessagePusher` and is its only caller. Each
//! registered connection is backed by a [`PusherChannel`]; a writer task on
//! the other end drains it into the socket. Dropping the channel (via
//! [`MessagePusher::unregister_client`]) closes the connection.

use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// Channel carrying encoded frames to a connection's writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
pub trait MessagePusher: Send {
    /// Attach the outbound channel of a newly accepted connection.
    fn register_client(&mut self, connection_id: ConnectionId, sender: PusherChannel);

    /// Detach and drop the outbound channel, closing the connection.
    fn unregister_client(&mut self, connection_id: ConnectionId);

    /// Send one event to one connection.
    fn push_to(
        &mut self,
        connection_id: ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// Send one event to every target. Per-target failures are logged and
    /// recorded, never returned.
    fn broadcast(&mut self, targets: &[ConnectionId], event: &ServerEvent);

    /// Connections whose writer has gone away since the last call.
    fn take_undeliverable(&mut self) -> Vec<ConnectionId>;
}
