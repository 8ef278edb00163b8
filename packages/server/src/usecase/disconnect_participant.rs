//! UseCase: 切断処理
//!
//! Removes a connection from the registry and from every room it was in,
//! detaches its outbound channel, and sends each surviving room its updated
//! roster. Rooms left empty are dropped by the registry.

use crate::domain::{ConnectionId, MessagePusher, Registry, RoomName};

use super::{broadcast_room_members, error::UseCaseError};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase<'a> {
    registry: &'a mut Registry,
    message_pusher: &'a mut dyn MessagePusher,
}

impl<'a> DisconnectParticipantUseCase<'a> {
    pub fn new(registry: &'a mut Registry, message_pusher: &'a mut dyn MessagePusher) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RoomName>)` - rooms the connection belonged to
    /// * `Err(UseCaseError::UnknownConnection)` - the id was already gone
    pub fn execute(self, connection_id: ConnectionId) -> Result<Vec<RoomName>, UseCaseError> {
        let Some(room_names) = self.registry.remove_connection(connection_id) else {
            return Err(UseCaseError::UnknownConnection(connection_id));
        };
        self.message_pusher.unregister_client(connection_id);

        for room_name in &room_names {
            if self.registry.room(room_name).is_some() {
                broadcast_room_members(self.registry, self.message_pusher, room_name);
            } else {
                tracing::info!("Room '{}' is empty and was dropped", room_name);
            }
        }

        Ok(room_names)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::{MessagePusher, ServerEvent},
        infrastructure::{codec, message_pusher::WebSocketMessagePusher},
        usecase::test_support::{id, registry_with, room},
    };

    #[test]
    fn test_disconnect_notifies_each_remaining_member_once() {
        // テスト項目: 切断すると、同じルームの残りメンバーに更新後の CLIENT_LIST がちょうど 1 回届く
        // given (前提条件):
        let mut registry = registry_with(
            &[1, 2, 3],
            &[
                (1, "lobby", "alice"),
                (2, "lobby", "bob"),
                (1, "games", "ali"),
                (3, "games", "carol"),
            ],
        );
        let mut pusher = WebSocketMessagePusher::new();
        let mut receivers = Vec::new();
        for value in 1..=3 {
            let (tx, rx) = mpsc::unbounded_channel();
            pusher.register_client(id(value), tx);
            receivers.push(rx);
        }

        // when (操作):
        let result = DisconnectParticipantUseCase::new(&mut registry, &mut pusher).execute(id(1));

        // then (期待する結果):
        assert_eq!(result, Ok(vec![room("games"), room("lobby")]));
        assert!(!registry.is_connected(id(1)));

        let bob: Vec<String> = std::iter::from_fn(|| receivers[1].try_recv().ok()).collect();
        assert_eq!(
            bob,
            vec![codec::encode(&ServerEvent::RoomMembers {
                room_name: "lobby".to_string(),
                names: vec!["bob".to_string()],
            })]
        );
        let carol: Vec<String> = std::iter::from_fn(|| receivers[2].try_recv().ok()).collect();
        assert_eq!(
            carol,
            vec![codec::encode(&ServerEvent::RoomMembers {
                room_name: "games".to_string(),
                names: vec!["carol".to_string()],
            })]
        );
        // alice's channel was dropped by the pusher
        assert!(matches!(
            receivers[0].try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_disconnect_last_member_drops_room() {
        // テスト項目: 最後のメンバーが切断するとルームが削除され、誰にも通知されない
        // given (前提条件):
        let mut registry = registry_with(&[1], &[(1, "lobby", "alice")]);
        let mut pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(id(1), tx);

        // when (操作):
        let result = DisconnectParticipantUseCase::new(&mut registry, &mut pusher).execute(id(1));

        // then (期待する結果):
        assert_eq!(result, Ok(vec![room("lobby")]));
        assert_eq!(registry.room_count(), 0);
        assert_eq!(pusher.client_count(), 0);
    }

    #[test]
    fn test_disconnect_unknown_connection() {
        // テスト項目: 既に削除された接続の切断は UnknownConnection になる
        // given (前提条件):
        let mut registry = registry_with(&[1], &[]);
        let mut pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = DisconnectParticipantUseCase::new(&mut registry, &mut pusher).execute(id(2));

        // then (期待する結果):
        assert_eq!(result, Err(UseCaseError::UnknownConnection(id(2))));
        assert_eq!(registry.connection_count(), 1);
    }
}
