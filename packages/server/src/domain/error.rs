//! Domain-level error types.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Validation errors raised when building value objects from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room name must not be empty")]
    RoomNameEmpty,

    #[error("room name exceeds {max} characters")]
    RoomNameTooLong { max: usize },

    #[error("display name must not be empty")]
    DisplayNameEmpty,

    #[error("display name exceeds {max} characters")]
    DisplayNameTooLong { max: usize },

    #[error("message body must not be empty")]
    MessageBodyEmpty,

    #[error("message body exceeds {max} characters")]
    MessageBodyTooLong { max: usize },
}

/// Membership errors raised by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// The connection is not a member of the room it referenced.
    #[error("connection {connection_id} is not a member of room '{room_name}'")]
    NotAMember {
        connection_id: ConnectionId,
        room_name: String,
    },

    /// The connection id is not (or no longer) registered.
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

/// Errors raised while pushing a frame to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} not found")]
    ClientNotFound(ConnectionId),

    #[error("failed to push message to connection {0}: peer is gone")]
    PushFailed(ConnectionId),
}

/// Errors raised while reading a frame from a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer closed the connection (EOF or a close frame).
    #[error("connection closed by peer")]
    Closed,

    #[error("read failed: {0}")]
    Read(String),
}
