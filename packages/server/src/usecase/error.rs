//! UseCase 層のエラー型定義

use thiserror::Error;

use crate::domain::{ConnectionId, RoomError, ServerEvent, ValueObjectError};

/// Errors raised while handling a client event.
///
/// The `Display` text is the `reason` sent back in a `REJECTED` frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UseCaseError {
    #[error("not a member")]
    NotAMember { room_name: String },

    #[error("invalid room name")]
    InvalidRoomName(#[source] ValueObjectError),

    #[error("invalid client name")]
    InvalidClientName(#[source] ValueObjectError),

    #[error("invalid message body")]
    InvalidMessageBody(#[source] ValueObjectError),

    /// The event references a connection the registry no longer knows.
    #[error("unknown connection")]
    UnknownConnection(ConnectionId),

    #[error("connection already registered")]
    DuplicateConnection(ConnectionId),
}

impl UseCaseError {
    /// The `REJECTED` event reporting this error to the offending client.
    pub fn to_rejection(&self) -> ServerEvent {
        let detail = match self {
            Self::NotAMember { room_name } => Some(format!("room '{}'", room_name)),
            Self::InvalidRoomName(e) | Self::InvalidClientName(e) | Self::InvalidMessageBody(e) => {
                Some(e.to_string())
            }
            Self::UnknownConnection(_) | Self::DuplicateConnection(_) => None,
        };
        ServerEvent::rejected(self.to_string(), detail)
    }
}

impl From<RoomError> for UseCaseError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotAMember { room_name, .. } => Self::NotAMember { room_name },
            RoomError::UnknownConnection(connection_id) => Self::UnknownConnection(connection_id),
        }
    }
}
