//! UseCase: ルーム退出処理

use crate::domain::{ConnectionId, MessagePusher, Registry, RoomName, ServerEvent};

use super::{broadcast_room_members, error::UseCaseError};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase<'a> {
    registry: &'a mut Registry,
    message_pusher: &'a mut dyn MessagePusher,
}

impl<'a> LeaveRoomUseCase<'a> {
    pub fn new(registry: &'a mut Registry, message_pusher: &'a mut dyn MessagePusher) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ルーム退出を実行
    ///
    /// Acknowledges the leaver with `SUCCESS_LEAVE_ROOM` and sends the
    /// remaining members the updated roster.
    pub fn execute(
        self,
        connection_id: ConnectionId,
        room_name: String,
    ) -> Result<(), UseCaseError> {
        let room_name = RoomName::try_from(room_name).map_err(UseCaseError::InvalidRoomName)?;

        let outcome = self.registry.leave(connection_id, &room_name)?;
        tracing::info!("Connection {} left room '{}'", connection_id, room_name);

        let accepted = ServerEvent::LeaveAccepted {
            room_name: room_name.as_str().to_string(),
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &accepted) {
            tracing::warn!("Failed to acknowledge leave: {}", e);
        }

        if outcome.room_dropped {
            tracing::info!("Room '{}' is empty and was dropped", room_name);
        } else {
            broadcast_room_members(self.registry, self.message_pusher, &room_name);
        }

        Ok(())
    }
}
