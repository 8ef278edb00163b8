//! UseCase: ルーム一覧取得処理

use crate::domain::{ConnectionId, Registry};

/// Point-in-time view of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub name: String,
    /// Display names in join order.
    pub members: Vec<String>,
    pub created_at: i64,
}

/// Point-in-time view of the whole registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub connections: Vec<ConnectionId>,
    pub rooms: Vec<RoomSnapshot>,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase<'a> {
    registry: &'a Registry,
}

impl<'a> GetRoomsUseCase<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// 現在の状態のスナップショットを返す（ルームは名前順）
    pub fn execute(&self) -> RegistrySnapshot {
        let rooms = self
            .registry
            .rooms()
            .into_iter()
            .map(|room| RoomSnapshot {
                name: room.name().as_str().to_string(),
                members: room.list_display_names(),
                created_at: room.created_at(),
            })
            .collect();

        RegistrySnapshot {
            connections: self.registry.connection_ids(),
            rooms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{id, registry_with};

    #[test]
    fn test_snapshot_lists_rooms_by_name() {
        // テスト項目: スナップショットがルーム名順・参加順で返される
        // given (前提条件):
        let registry = registry_with(
            &[1, 2, 3],
            &[(2, "lobby", "bob"), (1, "lobby", "alice"), (3, "dev", "carol")],
        );

        // when (操作):
        let snapshot = GetRoomsUseCase::new(&registry).execute();

        // then (期待する結果):
        assert_eq!(snapshot.connections, vec![id(1), id(2), id(3)]);
        assert_eq!(
            snapshot.rooms,
            vec![
                RoomSnapshot {
                    name: "dev".to_string(),
                    members: vec!["carol".to_string()],
                    created_at: 0,
                },
                RoomSnapshot {
                    name: "lobby".to_string(),
                    members: vec!["bob".to_string(), "alice".to_string()],
                    created_at: 0,
                },
            ]
        );
    }

    #[test]
    fn test_empty_registry_snapshot() {
        // テスト項目: 空のレジストリでは空のスナップショットになる
        // given (前提条件):
        let registry = Registry::new();

        // when (操作):
        let snapshot = GetRoomsUseCase::new(&registry).execute();

        // then (期待する結果):
        assert_eq!(snapshot, RegistrySnapshot::default());
    }
}
