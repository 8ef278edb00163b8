//! Use cases: one per state transition of the relay.
//!
//! Each use case borrows the registry and the message pusher from the relay
//! loop for the duration of one event, applies the transition, and pushes
//! the resulting frames. None of them can suspend, so an event is always
//! applied in full before the loop looks at the next one.

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod send_text;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::UseCaseError;
pub use get_rooms::{GetRoomsUseCase, RegistrySnapshot, RoomSnapshot};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use send_text::SendTextUseCase;

use crate::domain::{MessagePusher, Registry, RoomName, ServerEvent};

/// Send the current roster of `room_name` to all of its members.
///
/// Does nothing if the room no longer exists.
fn broadcast_room_members(
    registry: &Registry,
    message_pusher: &mut dyn MessagePusher,
    room_name: &RoomName,
) {
    let Some(room) = registry.room(room_name) else {
        return;
    };
    let event = ServerEvent::RoomMembers {
        room_name: room_name.as_str().to_string(),
        names: room.list_display_names(),
    };
    message_pusher.broadcast(&room.member_ids(), &event);
}

#[cfg(test)]
pub(crate) mod test_support {
    use roomcast_shared::time::FixedClock;

    use crate::domain::{ConnectionId, DisplayName, Registry, RoomName};

    pub const NOW: i64 = 1_700_000_000_000;

    pub fn clock() -> FixedClock {
        FixedClock::new(NOW)
    }

    pub fn id(value: u64) -> ConnectionId {
        ConnectionId::new(value)
    }

    pub fn room(value: &str) -> RoomName {
        RoomName::new(value).unwrap()
    }

    /// Registry with the given connections registered and the listed
    /// `(connection, room, name)` memberships applied in order.
    pub fn registry_with(connections: &[u64], memberships: &[(u64, &str, &str)]) -> Registry {
        let mut registry = Registry::new();
        for value in connections {
            registry.register_connection(id(*value), 0);
        }
        for (who, room_name, name) in memberships {
            registry
                .join(id(*who), room(room_name), DisplayName::new(*name).unwrap(), 0)
                .unwrap();
        }
        registry
    }
}
