//! Entities owned by the registry.

use std::collections::BTreeMap;

use super::value_object::{ConnectionId, DisplayName, RoomName};

/// A member of a room: which connection, and under which name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoomMember {
    connection_id: ConnectionId,
    display_name: DisplayName,
}

/// A named room and its members, kept in join order.
///
/// Only ever touched from the relay loop, so there is no internal locking.
#[derive(Debug, Clone)]
pub struct Room {
    name: RoomName,
    created_at: i64,
    members: Vec<RoomMember>,
}

impl Room {
    /// Create an empty room
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name of the room
    /// * `created_at` - Unix timestamp (milliseconds) of creation
    pub fn new(name: RoomName, created_at: i64) -> Self {
        Self {
            name,
            created_at,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &RoomName {
        &self.name
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Add a member. Idempotent: an existing member keeps the name it
    /// joined with.
    ///
    /// Returns `true` if the connection was inserted.
    pub fn add_member(&mut self, connection_id: ConnectionId, display_name: DisplayName) -> bool {
        if self.contains(connection_id) {
            return false;
        }
        self.members.push(RoomMember {
            connection_id,
            display_name,
        });
        true
    }

    /// Remove a member. Removing an absent member is not an error.
    ///
    /// Returns `true` if the connection was a member.
    pub fn remove_member(&mut self, connection_id: ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.connection_id != connection_id);
        self.members.len() != before
    }

    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.members.iter().any(|m| m.connection_id == connection_id)
    }

    pub fn display_name_of(&self, connection_id: ConnectionId) -> Option<&DisplayName> {
        self.members
            .iter()
            .find(|m| m.connection_id == connection_id)
            .map(|m| &m.display_name)
    }

    /// Display names of all members, in join order.
    pub fn list_display_names(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.display_name.as_str().to_string())
            .collect()
    }

    /// Connection ids of all members, in join order.
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.connection_id).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A live connection as seen by the registry.
///
/// The transport handle itself lives in the
/// [`MessagePusher`](super::MessagePusher); this side tracks which rooms the
/// connection is in and the name it uses in each.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: i64,
    display_names: BTreeMap<RoomName, DisplayName>,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: i64) -> Self {
        Self {
            id,
            connected_at,
            display_names: BTreeMap::new(),
        }
    }

    pub fn display_name_in(&self, room_name: &RoomName) -> Option<&DisplayName> {
        self.display_names.get(room_name)
    }

    /// Rooms this connection belongs to, sorted by name.
    pub fn room_names(&self) -> Vec<RoomName> {
        self.display_names.keys().cloned().collect()
    }

    pub(crate) fn record_membership(&mut self, room_name: RoomName, display_name: DisplayName) {
        self.display_names.entry(room_name).or_insert(display_name);
    }

    pub(crate) fn forget_membership(&mut self, room_name: &RoomName) -> bool {
        self.display_names.remove(room_name).is_some()
    }
}
