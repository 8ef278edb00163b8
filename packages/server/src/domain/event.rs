//! Typed events exchanged between clients and the relay.

/// An event sent by a client, as decoded by the protocol codec.
///
/// Fields are raw strings; they are validated into value objects by the use
/// cases that handle them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    JoinRoom {
        room_name: String,
        client_name: String,
    },
    LeaveRoom {
        room_name: String,
    },
    Text {
        room_name: String,
        body: String,
    },
}

/// An event sent by the relay to one or more clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    JoinAccepted {
        room_name: String,
    },
    LeaveAccepted {
        room_name: String,
    },
    /// Current roster of a room, in join order.
    RoomMembers {
        room_name: String,
        names: Vec<String>,
    },
    TextBroadcast {
        room_name: String,
        sender_name: String,
        body: String,
    },
    Rejected {
        reason: String,
        detail: Option<String>,
    },
}

impl ServerEvent {
    /// Build a rejection with an optional elaboration.
    pub fn rejected(reason: impl Into<String>, detail: Option<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
            detail,
        }
    }
}
