//! UseCase: 接続受付処理
//!
//! Registers a freshly accepted connection in the registry and attaches its
//! outbound channel to the message pusher. A new connection is in no room,
//! so nothing is broadcast.

use roomcast_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, Registry};

use super::error::UseCaseError;

/// 接続受付のユースケース
pub struct ConnectParticipantUseCase<'a> {
    registry: &'a mut Registry,
    message_pusher: &'a mut dyn MessagePusher,
    clock: &'a dyn Clock,
}

impl<'a> ConnectParticipantUseCase<'a> {
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

    /// 接続を登録する
    ///
    /// # Arguments
    ///
    /// * `connection_id` - Id issued for the connection
    /// * `sender` - Outbound channel drained by the connection's writer task
    ///
    /// # Returns
    ///
    /// * `Err(UseCaseError::DuplicateConnection)` - the id is already live;
    ///   the channel is dropped
    pub fn execute(
        self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), UseCaseError> {
        if !self
            .registry
            .register_connection(connection_id, self.clock.now_millis())
        {
            return Err(UseCaseError::DuplicateConnection(connection_id));
        }
        self.message_pusher.register_client(connection_id, sender);
        Ok(())
    }
}
