//! UseCase: ルーム参加処理
//!
//! ### 何をテストしているか
//! - 新規参加: SUCCESS_JOIN_ROOM を参加者に返し、CLIENT_LIST を全メンバーに送る
//! - 二重参加: SUCCESS_JOIN_ROOM のみ返し、再ブロードキャストしない（表示名も変わらない）
//! - 不正な入力: ルーム名・表示名の検証エラー

use roomcast_shared::time::Clock;

use crate::domain::{
    ConnectionId, DisplayName, JoinOutcome, MessagePusher, Registry, RoomName, ServerEvent,
};

use super::{broadcast_room_members, error::UseCaseError};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase<'a> {
    registry: &'a mut Registry,
    message_pusher: &'a mut dyn MessagePusher,
    clock: &'a dyn Clock,
}

impl<'a> JoinRoomUseCase<'a> {
    pub fn new(
        registry: &'a mut Registry,
        message_pusher: &'a mut dyn MessagePusher,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// The room is created if it does not exist yet. Joining a room the
    /// connection is already in is acknowledged again but changes nothing.
    pub fn execute(
        self,
        connection_id: ConnectionId,
        room_name: String,
        client_name: String,
    ) -> Result<JoinOutcome, UseCaseError> {
        let room_name = RoomName::try_from(room_name).map_err(UseCaseError::InvalidRoomName)?;
        let display_name =
            DisplayName::try_from(client_name).map_err(UseCaseError::InvalidClientName)?;

        let outcome = self.registry.join(
            connection_id,
            room_name.clone(),
            display_name.clone(),
            self.clock.now_millis(),
        )?;

        match outcome {
            JoinOutcome::Joined { created } => {
                if created {
                    tracing::info!("Room '{}' created", room_name);
                }
                tracing::info!(
                    "Connection {} joined room '{}' as '{}'",
                    connection_id,
                    room_name,
                    display_name.as_str()
                );
            }
            JoinOutcome::AlreadyMember => {
                tracing::debug!(
                    "Connection {} is already in room '{}'",
                    connection_id,
                    room_name
                );
            }
        }

        let accepted = ServerEvent::JoinAccepted {
            room_name: room_name.as_str().to_string(),
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &accepted) {
            tracing::warn!("Failed to acknowledge join: {}", e);
        }

        if matches!(outcome, JoinOutcome::Joined { .. }) {
            broadcast_room_members(self.registry, self.message_pusher, &room_name);
        }

        Ok(outcome)
    }
}
