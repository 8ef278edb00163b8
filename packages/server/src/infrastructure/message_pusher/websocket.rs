//! MessagePusher backed by one unbounded channel per connection.
//!
//! The WebSocket handler creates the channel and spawns a writer task that
//! drains it into the socket. This pusher owns the sending half: pushing a
//! frame is a channel send, and dropping the sender closes the socket.
//!
//! A send fails only when the writer task has ended (the peer is gone). Such
//! connections are remembered and handed back through
//! [`MessagePusher::take_undeliverable`] so the relay loop can tear them down.

use std::collections::HashMap;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent},
    infrastructure::codec,
};

#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    /// Outbound channel per live connection
    clients: HashMap<ConnectionId, PusherChannel>,
    /// Connections whose writer was found closed
    undeliverable: Vec<ConnectionId>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    fn send_frame(
        &mut self,
        connection_id: ConnectionId,
        frame: &str,
    ) -> Result<(), MessagePushError> {
        let Some(sender) = self.clients.get(&connection_id) else {
            return Err(MessagePushError::ClientNotFound(connection_id));
        };
        if sender.send(frame.to_string()).is_err() {
            if !self.undeliverable.contains(&connection_id) {
                self.undeliverable.push(connection_id);
            }
            return Err(MessagePushError::PushFailed(connection_id));
        }
        Ok(())
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn register_client(&mut self, connection_id: ConnectionId, sender: PusherChannel) {
        self.clients.insert(connection_id, sender);
        tracing::debug!("Connection {} registered to MessagePusher", connection_id);
    }

    fn unregister_client(&mut self, connection_id: ConnectionId) {
        if self.clients.remove(&connection_id).is_some() {
            tracing::debug!("Connection {} unregistered from MessagePusher", connection_id);
        }
        self.undeliverable.retain(|id| *id != connection_id);
    }

    fn push_to(
        &mut self,
        connection_id: ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = codec::encode(event);
        self.send_frame(connection_id, &frame)?;
        tracing::debug!("Pushed {} to connection {}", frame, connection_id);
        Ok(())
    }

    fn broadcast(&mut self, targets: &[ConnectionId], event: &ServerEvent) {
        let frame = codec::encode(event);
        for target in targets {
            match self.send_frame(*target, &frame) {
                Ok(()) => tracing::debug!("Broadcasted {} to connection {}", frame, target),
                Err(e) => tracing::warn!("Broadcast skipped a recipient: {}", e),
            }
        }
    }

    fn take_undeliverable(&mut self) -> Vec<ConnectionId> {
        std::mem::take(&mut self.undeliverable)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn id(value: u64) -> ConnectionId {
        ConnectionId::new(value)
    }

    fn joined() -> ServerEvent {
        ServerEvent::JoinAccepted {
            room_name: "lobby".to_string(),
        }
    }

    #[test]
    fn test_push_to_success() {
        // テスト項目: 登録済みの接続にエンコード済みフレームが届く
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(id(1), tx);

        // when (操作):
        let result = pusher.push_to(id(1), &joined());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.try_recv().unwrap(),
            r#"{"type":"SUCCESS_JOIN_ROOM","data":{"roomName":"lobby"}}"#
        );
    }

    #[test]
    fn test_push_to_unknown_client() {
        // テスト項目: 未登録の接続への送信は ClientNotFound になり、切断対象にはならない
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(id(9), &joined());

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ClientNotFound(id(9))));
        assert!(pusher.take_undeliverable().is_empty());
    }

    #[test]
    fn test_push_to_closed_writer_is_recorded() {
        // テスト項目: 書き込み側が終了した接続への送信は失敗し、切断対象として記録される
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(id(1), tx);
        drop(rx);

        // when (操作):
        let first = pusher.push_to(id(1), &joined());
        let second = pusher.push_to(id(1), &joined());

        // then (期待する結果):
        assert_eq!(first, Err(MessagePushError::PushFailed(id(1))));
        assert_eq!(second, Err(MessagePushError::PushFailed(id(1))));
        assert_eq!(pusher.take_undeliverable(), vec![id(1)]);
        assert!(pusher.take_undeliverable().is_empty());
    }

    #[test]
    fn test_broadcast_tolerates_partial_failure() {
        // テスト項目: 一部の送信失敗があっても他の接続には届く
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        let (bob_tx, bob_rx) = mpsc::unbounded_channel();
        let (carol_tx, mut carol_rx) = mpsc::unbounded_channel();
        pusher.register_client(id(1), alice_tx);
        pusher.register_client(id(2), bob_tx);
        pusher.register_client(id(3), carol_tx);
        drop(bob_rx);

        // when (操作):
        pusher.broadcast(&[id(1), id(2), id(3), id(4)], &joined());

        // then (期待する結果):
        assert!(alice_rx.try_recv().is_ok());
        assert!(carol_rx.try_recv().is_ok());
        assert_eq!(pusher.take_undeliverable(), vec![id(2)]);
    }

    #[test]
    fn test_unregister_client_closes_channel() {
        // テスト項目: 登録解除で送信チャンネルが破棄され、受信側が終了を検知する
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        pusher.register_client(id(1), tx);

        // when (操作):
        pusher.unregister_client(id(1));

        // then (期待する結果):
        assert_eq!(pusher.client_count(), 0);
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
