//! UseCase: テキスト送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendTextUseCase::execute() メソッド
//! - ルームメンバー全員（送信者を含む）への TEXT_BROADCAST
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者の表示名付きでブロードキャストされる
//! - 異常系：未参加ルームへの送信、不正な本文
//! - エッジケース：ルームごとに異なる表示名を使っている送信者

use crate::domain::{ConnectionId, MessageBody, MessagePusher, Registry, RoomName, ServerEvent};

use super::error::UseCaseError;

/// テキスト送信のユースケース
pub struct SendTextUseCase<'a> {
    registry: &'a Registry,
    message_pusher: &'a mut dyn MessagePusher,
}

impl<'a> SendTextUseCase<'a> {
    pub fn new(registry: &'a Registry, message_pusher: &'a mut dyn MessagePusher) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// テキスト送信を実行
    ///
    /// Membership is checked before the body so that a non-member never
    /// learns anything about the room from the rejection.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - connections the broadcast was addressed to
    pub fn execute(
        self,
        connection_id: ConnectionId,
        room_name: String,
        body: String,
    ) -> Result<Vec<ConnectionId>, UseCaseError> {
        let room_name = RoomName::try_from(room_name).map_err(UseCaseError::InvalidRoomName)?;
        if !self.registry.is_connected(connection_id) {
            return Err(UseCaseError::UnknownConnection(connection_id));
        }

        let not_a_member = || UseCaseError::NotAMember {
            room_name: room_name.as_str().to_string(),
        };
        let room = self.registry.room(&room_name).ok_or_else(not_a_member)?;
        let sender_name = room.display_name_of(connection_id).ok_or_else(not_a_member)?;

        let body = MessageBody::try_from(body).map_err(UseCaseError::InvalidMessageBody)?;

        let targets = room.member_ids();
        tracing::debug!(
            "Text from {} in '{}' to {} member(s)",
            connection_id,
            room_name,
            targets.len()
        );
        let event = ServerEvent::TextBroadcast {
            room_name: room_name.as_str().to_string(),
            sender_name: sender_name.as_str().to_string(),
            body: body.into_string(),
        };
        self.message_pusher.broadcast(&targets, &event);

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ValueObjectError, message_pusher::MockMessagePusher},
        usecase::test_support::{id, registry_with},
    };

    #[test]
    fn test_text_is_broadcast_to_all_members_including_sender() {
        // テスト項目: TEXT_BROADCAST が送信者を含む全メンバーに送られる
        // given (前提条件):
        let registry = registry_with(&[1, 2], &[(1, "lobby", "alice"), (2, "lobby", "bob")]);
        let mut pusher = MockMessagePusher::new();
        let expected = ServerEvent::TextBroadcast {
            room_name: "lobby".to_string(),
            sender_name: "alice".to_string(),
            body: "hi".to_string(),
        };
        pusher
            .expect_broadcast()
            .withf(move |targets, event| {
                targets.to_vec() == vec![ConnectionId::new(1), ConnectionId::new(2)]
                    && *event == expected
            })
            .times(1)
            .return_const(());
        pusher.expect_push_to().never();

        // when (操作):
        let result = SendTextUseCase::new(&registry, &mut pusher).execute(
            id(1),
            "lobby".to_string(),
            "hi".to_string(),
        );

        // then (期待する結果):
        assert_eq!(result, Ok(vec![id(1), id(2)]));
    }

    #[test]
    fn test_sender_name_is_the_one_used_in_that_room() {
        // テスト項目: ルームごとの表示名が送信者名として使われる
        // given (前提条件):
        let registry = registry_with(
            &[1],
            &[(1, "lobby", "alice"), (1, "dev", "al")],
        );
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|_, event| {
                matches!(event, ServerEvent::TextBroadcast { sender_name, .. } if sender_name == "al")
            })
            .times(1)
            .return_const(());

        // when (操作):
        let result = SendTextUseCase::new(&registry, &mut pusher).execute(
            id(1),
            "dev".to_string(),
            "ping".to_string(),
        );

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_text_from_non_member_is_rejected_without_broadcast() {
        // テスト項目: 未参加ルームへの TEXT は NotAMember になり、誰にも送られない
        // given (前提条件):
        let registry = registry_with(&[1, 2], &[(1, "lobby", "alice")]);
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        pusher.expect_push_to().never();

        // when (操作):
        let existing = SendTextUseCase::new(&registry, &mut pusher).execute(
            id(2),
            "lobby".to_string(),
            "hi".to_string(),
        );
        let missing = SendTextUseCase::new(&registry, &mut pusher).execute(
            id(2),
            "nowhere".to_string(),
            "hi".to_string(),
        );

        // then (期待する結果):
        assert_eq!(
            existing,
            Err(UseCaseError::NotAMember {
                room_name: "lobby".to_string()
            })
        );
        assert_eq!(
            missing,
            Err(UseCaseError::NotAMember {
                room_name: "nowhere".to_string()
            })
        );
    }

    #[test]
    fn test_blank_body_is_rejected() {
        // テスト項目: 空白のみの本文は InvalidMessageBody になる
        // given (前提条件):
        let registry = registry_with(&[1], &[(1, "lobby", "alice")]);
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();

        // when (操作):
        let result = SendTextUseCase::new(&registry, &mut pusher).execute(
            id(1),
            "lobby".to_string(),
            "   ".to_string(),
        );

        // then (期待する結果):
        assert_eq!(
            result,
            Err(UseCaseError::InvalidMessageBody(
                ValueObjectError::MessageBodyEmpty
            ))
        );
    }
}
