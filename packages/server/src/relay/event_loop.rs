//! The relay event loop.

use std::{collections::HashMap, sync::Arc};

use roomcast_shared::time::Clock;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ClientEvent, ConnectionId, ConnectionIdFactory, MessagePusher, Registry, ServerEvent},
    infrastructure::codec,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, SendTextUseCase, UseCaseError,
    },
};

use super::{
    event::{ConnectionClosed, InboundFrame, ListenerEvent},
    handle::RelayHandle,
    reader::ConnectionReader,
};

/// Reason sent back for frames the codec could not decode.
const UNABLE_TO_PARSE: &str = "unable to parse";

enum Next {
    Listener(Option<ListenerEvent>),
    Frame(InboundFrame),
    Closed(ConnectionClosed),
}

/// Single owner of the registry.
///
/// Waits on three sources with a biased `select!`, in this order:
/// listener events, inbound frames, close notifications. Because a reader
/// sends its close only after its last frame, every frame of a connection
/// is applied before the connection is torn down.
pub struct RelayLoop<P: MessagePusher> {
    registry: Registry,
    message_pusher: P,
    id_factory: ConnectionIdFactory,
    clock: Arc<dyn Clock>,
    /// Reader task per live connection
    readers: HashMap<ConnectionId, JoinHandle<()>>,
    listener_rx: mpsc::UnboundedReceiver<ListenerEvent>,
    frame_tx: mpsc::UnboundedSender<InboundFrame>,
    frame_rx: mpsc::UnboundedReceiver<InboundFrame>,
    close_tx: mpsc::UnboundedSender<ConnectionClosed>,
    close_rx: mpsc::UnboundedReceiver<ConnectionClosed>,
}

impl<P: MessagePusher + 'static> RelayLoop<P> {
    pub fn new(
        message_pusher: P,
        id_factory: ConnectionIdFactory,
        clock: Arc<dyn Clock>,
    ) -> (Self, RelayHandle) {
        let (listener_tx, listener_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = mpsc::unbounded_channel();

        let relay = Self {
            registry: Registry::new(),
            message_pusher,
            id_factory,
            clock,
            readers: HashMap::new(),
            listener_rx,
            frame_tx,
            frame_rx,
            close_tx,
            close_rx,
        };
        (relay, RelayHandle::new(listener_tx))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until every [`RelayHandle`] is dropped and the last connection
    /// has closed.
    pub async fn run(mut self) {
        tracing::info!("Relay loop started");
        let mut listener_open = true;

        loop {
            if !listener_open && self.registry.connection_count() == 0 {
                break;
            }

            // The loop holds its own frame/close senders, so those two
            // branches never see `None`.
            let next = tokio::select! {
                biased;
                event = self.listener_rx.recv(), if listener_open => Next::Listener(event),
                Some(frame) = self.frame_rx.recv() => Next::Frame(frame),
                Some(closed) = self.close_rx.recv() => Next::Closed(closed),
                else => break,
            };

            match next {
                Next::Listener(Some(event)) => self.on_listener_event(event),
                Next::Listener(None) => {
                    listener_open = false;
                    tracing::info!(
                        "Listener stopped; waiting for {} connection(s) to close",
                        self.registry.connection_count()
                    );
                }
                Next::Frame(frame) => self.on_frame(frame),
                Next::Closed(closed) => self.on_closed(closed),
            }

            self.tear_down_undeliverable();
        }

        tracing::info!("Relay loop stopped");
    }

    fn on_listener_event(&mut self, event: ListenerEvent) {
        match event {
            ListenerEvent::Accepted { source, outbound } => {
                let connection_id = self.id_factory.generate();
                let result = ConnectParticipantUseCase::new(
                    &mut self.registry,
                    &mut self.message_pusher,
                    self.clock.as_ref(),
                )
                .execute(connection_id, outbound);
                if let Err(e) = result {
                    tracing::error!("Failed to register connection {}: {}", connection_id, e);
                    return;
                }

                let reader = ConnectionReader::new(
                    connection_id,
                    source,
                    self.frame_tx.clone(),
                    self.close_tx.clone(),
                );
                self.readers.insert(connection_id, reader.spawn());
                tracing::info!(
                    "Connection {} accepted ({} live)",
                    connection_id,
                    self.registry.connection_count()
                );
            }
            ListenerEvent::Snapshot(reply) => {
                let snapshot = GetRoomsUseCase::new(&self.registry).execute();
                if reply.send(snapshot).is_err() {
                    tracing::debug!("Snapshot requester went away");
                }
            }
        }
    }

    fn on_frame(&mut self, frame: InboundFrame) {
        let InboundFrame { connection_id, raw } = frame;
        if !self.registry.is_connected(connection_id) {
            tracing::warn!("Dropping frame from closed connection {}", connection_id);
            return;
        }

        let event = match codec::parse(&raw) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Unparseable frame from connection {}: {}", connection_id, e);
                self.reply(
                    connection_id,
                    &ServerEvent::rejected(UNABLE_TO_PARSE, Some(e.to_string())),
                );
                return;
            }
        };
        tracing::debug!("Connection {} sent {:?}", connection_id, event);

        if let Err(e) = self.dispatch(connection_id, event) {
            tracing::warn!("Rejected event from connection {}: {}", connection_id, e);
            self.reply(connection_id, &e.to_rejection());
        }
    }

    fn dispatch(
        &mut self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), UseCaseError> {
        match event {
            ClientEvent::JoinRoom {
                room_name,
                client_name,
            } => JoinRoomUseCase::new(
                &mut self.registry,
                &mut self.message_pusher,
                self.clock.as_ref(),
            )
            .execute(connection_id, room_name, client_name)
            .map(|_| ()),
            ClientEvent::LeaveRoom { room_name } => {
                LeaveRoomUseCase::new(&mut self.registry, &mut self.message_pusher)
                    .execute(connection_id, room_name)
            }
            ClientEvent::Text { room_name, body } => {
                SendTextUseCase::new(&self.registry, &mut self.message_pusher)
                    .execute(connection_id, room_name, body)
                    .map(|_| ())
            }
        }
    }

    fn on_closed(&mut self, closed: ConnectionClosed) {
        let ConnectionClosed {
            connection_id,
            reason,
        } = closed;
        self.readers.remove(&connection_id);

        if !self.registry.is_connected(connection_id) {
            tracing::debug!("Close for already removed connection {}", connection_id);
            return;
        }
        tracing::info!("Connection {} closed: {}", connection_id, reason);
        self.disconnect(connection_id);
    }

    /// Remove connections whose outbound channel was found closed while
    /// handling the last event. Tearing one down can broadcast a roster
    /// that reveals another dead channel, so repeat until none are left.
    fn tear_down_undeliverable(&mut self) {
        loop {
            let dead = self.message_pusher.take_undeliverable();
            if dead.is_empty() {
                return;
            }
            for connection_id in dead {
                if let Some(reader) = self.readers.remove(&connection_id) {
                    reader.abort();
                }
                if self.registry.is_connected(connection_id) {
                    tracing::warn!("Write to connection {} failed; closing it", connection_id);
                    self.disconnect(connection_id);
                }
            }
        }
    }

    fn disconnect(&mut self, connection_id: ConnectionId) {
        match DisconnectParticipantUseCase::new(&mut self.registry, &mut self.message_pusher)
            .execute(connection_id)
        {
            Ok(room_names) => tracing::info!(
                "Connection {} removed from {} room(s) ({} live)",
                connection_id,
                room_names.len(),
                self.registry.connection_count()
            ),
            Err(e) => tracing::warn!("Failed to remove connection {}: {}", connection_id, e),
        }
    }

    fn reply(&mut self, connection_id: ConnectionId, event: &ServerEvent) {
        if let Err(e) = self.message_pusher.push_to(connection_id, event) {
            tracing::warn!("Failed to reply to connection {}: {}", connection_id, e);
        }
    }
}
