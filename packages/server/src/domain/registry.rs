//! Connection registry: the single owner of all relay state.
//!
//! The registry keeps two maps that must agree with each other:
//! - `connections`: which ids are live, and which rooms each one is in
//! - `rooms`: room name → members (join order)
//!
//! Every id that appears in a room is present in `connections`.
//! [`Registry::remove_connection`] purges a connection from all of its rooms
//! in the same call that drops it from `connections`.
//!
//! Empty rooms are dropped as soon as their last member leaves.

use std::collections::HashMap;

use super::{
    entity::{Connection, Room},
    error::RoomError,
    value_object::{ConnectionId, DisplayName, RoomName},
};

/// Result of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The connection was added to the room (`created` if the room is new).
    Joined { created: bool },
    /// The connection was already a member; nothing changed.
    AlreadyMember,
}

/// Result of a successful leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// The room became empty and was dropped.
    pub room_dropped: bool,
}

#[derive(Debug, Default)]
pub struct Registry {
    connections: HashMap<ConnectionId, Connection>,
    rooms: HashMap<RoomName, Room>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection.
    ///
    /// Returns `false` if the id is already registered.
    pub fn register_connection(&mut self, connection_id: ConnectionId, connected_at: i64) -> bool {
        if self.connections.contains_key(&connection_id) {
            return false;
        }
        self.connections
            .insert(connection_id, Connection::new(connection_id, connected_at));
        true
    }

    pub fn is_connected(&self, connection_id: ConnectionId) -> bool {
        self.connections.contains_key(&connection_id)
    }

    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Live connection ids, sorted.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.connections.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn room(&self, room_name: &RoomName) -> Option<&Room> {
        self.rooms.get(room_name)
    }

    /// All rooms, sorted by name.
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.name().cmp(b.name()));
        rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Whether `connection_id` is a member of `room_name`.
    pub fn is_member(&self, connection_id: ConnectionId, room_name: &RoomName) -> bool {
        self.rooms
            .get(room_name)
            .is_some_and(|room| room.contains(connection_id))
    }

    /// Add a connection to a room, creating the room if needed.
    ///
    /// # Arguments
    ///
    /// * `connection_id` - The joining connection
    /// * `room_name` - Room to join
    /// * `display_name` - Name to use in that room (ignored if already a member)
    /// * `now` - Timestamp used if the room has to be created
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room_name: RoomName,
        display_name: DisplayName,
        now: i64,
    ) -> Result<JoinOutcome, RoomError> {
        let Some(connection) = self.connections.get_mut(&connection_id) else {
            return Err(RoomError::UnknownConnection(connection_id));
        };

        let mut created = false;
        let room = self.rooms.entry(room_name.clone()).or_insert_with(|| {
            created = true;
            Room::new(room_name.clone(), now)
        });

        if !room.add_member(connection_id, display_name.clone()) {
            return Ok(JoinOutcome::AlreadyMember);
        }
        connection.record_membership(room_name, display_name);

        Ok(JoinOutcome::Joined { created })
    }

    /// Remove a connection from a room, dropping the room if it becomes empty.
    pub fn leave(
        &mut self,
        connection_id: ConnectionId,
        room_name: &RoomName,
    ) -> Result<LeaveOutcome, RoomError> {
        let Some(connection) = self.connections.get_mut(&connection_id) else {
            return Err(RoomError::UnknownConnection(connection_id));
        };
        let Some(room) = self.rooms.get_mut(room_name) else {
            return Err(RoomError::NotAMember {
                connection_id,
                room_name: room_name.as_str().to_string(),
            });
        };
        if !room.remove_member(connection_id) {
            return Err(RoomError::NotAMember {
                connection_id,
                room_name: room_name.as_str().to_string(),
            });
        }
        connection.forget_membership(room_name);

        let room_dropped = room.is_empty();
        if room_dropped {
            self.rooms.remove(room_name);
        }
        Ok(LeaveOutcome { room_dropped })
    }

    /// Drop a connection and purge it from every room it was in.
    ///
    /// Returns the names of the rooms it belonged to, or `None` if the id was
    /// not registered. Rooms left empty are dropped.
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Vec<RoomName>> {
        let connection = self.connections.remove(&connection_id)?;
        let room_names = connection.room_names();

        for room_name in &room_names {
            if let Some(room) = self.rooms.get_mut(room_name) {
                room.remove_member(connection_id);
                if room.is_empty() {
                    self.rooms.remove(room_name);
                }
            }
        }

        Some(room_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u64) -> ConnectionId {
        ConnectionId::new(value)
    }

    fn room(value: &str) -> RoomName {
        RoomName::new(value).unwrap()
    }

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value).unwrap()
    }

    fn registry_with(ids: &[u64]) -> Registry {
        let mut registry = Registry::new();
        for value in ids {
            registry.register_connection(id(*value), 0);
        }
        registry
    }

    /// Every member of every room must be a live connection, and every
    /// connection's room list must match the rooms that list it.
    fn assert_consistent(registry: &Registry) {
        for r in registry.rooms() {
            assert!(!r.is_empty(), "empty room '{}' was retained", r.name());
            for member in r.member_ids() {
                let connection = registry
                    .connection(member)
                    .unwrap_or_else(|| panic!("{} in '{}' is not live", member, r.name()));
                assert!(connection.display_name_in(r.name()).is_some());
            }
        }
        for connection_id in registry.connection_ids() {
            let connection = registry.connection(connection_id).unwrap();
            for room_name in connection.room_names() {
                assert!(registry.is_member(connection_id, &room_name));
            }
        }
    }

    #[test]
    fn test_register_connection_rejects_duplicate_id() {
        // テスト項目: 同じ ID の二重登録は拒否される
        // given (前提条件):
        let mut registry = Registry::new();

        // when (操作):
        let first = registry.register_connection(id(1), 0);
        let second = registry.register_connection(id(1), 0);

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn test_join_creates_room_lazily() {
        // テスト項目: 存在しないルームへの参加でルームが作成される
        // given (前提条件):
        let mut registry = registry_with(&[1]);

        // when (操作):
        let outcome = registry.join(id(1), room("lobby"), name("alice"), 42);

        // then (期待する結果):
        assert_eq!(outcome, Ok(JoinOutcome::Joined { created: true }));
        let lobby = registry.room(&room("lobby")).unwrap();
        assert_eq!(lobby.created_at(), 42);
        assert_eq!(lobby.list_display_names(), vec!["alice"]);
        assert_consistent(&registry);
    }

    #[test]
    fn test_join_twice_is_idempotent() {
        // テスト項目: 同じルームへの二重参加でメンバー数と表示名が変わらない
        // given (前提条件):
        let mut registry = registry_with(&[1]);
        registry.join(id(1), room("lobby"), name("alice"), 0).unwrap();

        // when (操作):
        let outcome = registry.join(id(1), room("lobby"), name("alice2"), 0);

        // then (期待する結果):
        assert_eq!(outcome, Ok(JoinOutcome::AlreadyMember));
        let lobby = registry.room(&room("lobby")).unwrap();
        assert_eq!(lobby.len(), 1);
        assert_eq!(lobby.list_display_names(), vec!["alice"]);
        assert_eq!(
            registry
                .connection(id(1))
                .unwrap()
                .display_name_in(&room("lobby"))
                .unwrap()
                .as_str(),
            "alice"
        );
    }

    #[test]
    fn test_join_unknown_connection_fails() {
        // テスト項目: 未登録の接続はルームに参加できず、ルームも作成されない
        // given (前提条件):
        let mut registry = Registry::new();

        // when (操作):
        let outcome = registry.join(id(9), room("lobby"), name("ghost"), 0);

        // then (期待する結果):
        assert_eq!(outcome, Err(RoomError::UnknownConnection(id(9))));
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn test_leave_drops_empty_room() {
        // テスト項目: 最後のメンバーが退出するとルームが削除される
        // given (前提条件):
        let mut registry = registry_with(&[1, 2]);
        registry.join(id(1), room("lobby"), name("alice"), 0).unwrap();
        registry.join(id(2), room("lobby"), name("bob"), 0).unwrap();

        // when (操作):
        let first = registry.leave(id(1), &room("lobby"));
        let second = registry.leave(id(2), &room("lobby"));

        // then (期待する結果):
        assert_eq!(first, Ok(LeaveOutcome { room_dropped: false }));
        assert_eq!(second, Ok(LeaveOutcome { room_dropped: true }));
        assert!(registry.room(&room("lobby")).is_none());
        assert_consistent(&registry);
    }

    #[test]
    fn test_leave_when_not_member_fails() {
        // テスト項目: 未参加のルームからの退出は NotAMember エラーになる
        // given (前提条件):
        let mut registry = registry_with(&[1, 2]);
        registry.join(id(1), room("lobby"), name("alice"), 0).unwrap();

        // when (操作):
        let not_member = registry.leave(id(2), &room("lobby"));
        let no_room = registry.leave(id(2), &room("nowhere"));

        // then (期待する結果):
        assert!(matches!(not_member, Err(RoomError::NotAMember { .. })));
        assert!(matches!(no_room, Err(RoomError::NotAMember { .. })));
        assert_eq!(registry.room(&room("lobby")).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_connection_purges_every_room() {
        // テスト項目: 切断した接続はすべてのルームから削除される
        // given (前提条件):
        let mut registry = registry_with(&[1, 2]);
        registry.join(id(1), room("lobby"), name("alice"), 0).unwrap();
        registry.join(id(1), room("games"), name("ali"), 0).unwrap();
        registry.join(id(2), room("lobby"), name("bob"), 0).unwrap();

        // when (操作):
        let rooms = registry.remove_connection(id(1));

        // then (期待する結果):
        assert_eq!(rooms, Some(vec![room("games"), room("lobby")]));
        assert!(!registry.is_connected(id(1)));
        assert!(registry.room(&room("games")).is_none());
        assert_eq!(
            registry.room(&room("lobby")).unwrap().list_display_names(),
            vec!["bob"]
        );
        assert_consistent(&registry);
    }

    #[test]
    fn test_remove_unknown_connection_returns_none() {
        // テスト項目: 未登録 ID の削除は None を返す
        // given (前提条件):
        let mut registry = registry_with(&[1]);

        // when (操作):
        let result = registry.remove_connection(id(2));

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn test_connections_track_connect_and_disconnect_sequence() {
        // テスト項目: 任意の操作列の後、接続集合は「接続済みかつ未切断」の集合と一致する
        // given (前提条件):
        let mut registry = Registry::new();
        let rooms = ["a", "b", "c"];
        let mut expected: Vec<u64> = Vec::new();

        // when (操作):
        // deterministic pseudo-random walk over connect/join/leave/disconnect
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next_id = 1;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let pick = |n: usize| (seed as usize) % n;
            match pick(4) {
                0 => {
                    registry.register_connection(id(next_id), 0);
                    expected.push(next_id);
                    next_id += 1;
                }
                1 if !expected.is_empty() => {
                    let who = expected[pick(expected.len())];
                    let _ = registry.join(id(who), room(rooms[pick(3)]), name("n"), 0);
                }
                2 if !expected.is_empty() => {
                    let who = expected[pick(expected.len())];
                    let _ = registry.leave(id(who), &room(rooms[pick(3)]));
                }
                3 if !expected.is_empty() => {
                    let index = pick(expected.len());
                    let who = expected.remove(index);
                    assert!(registry.remove_connection(id(who)).is_some());
                }
                _ => {}
            }
            assert_consistent(&registry);
        }

        // then (期待する結果):
        expected.sort();
        let live: Vec<u64> = registry.connection_ids().iter().map(|c| c.value()).collect();
        assert_eq!(live, expected);
    }
}
