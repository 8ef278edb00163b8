//! Events consumed by the relay loop, one type per source.

use tokio::sync::oneshot;

use crate::{
    domain::{ConnectionId, FrameSource, PusherChannel, TransportError},
    usecase::RegistrySnapshot,
};

/// Sent by the listener side through a [`RelayHandle`](super::RelayHandle).
pub enum ListenerEvent {
    /// A transport connection was accepted. The loop assigns its id, registers
    /// `outbound` with the message pusher and starts a reader over `source`.
    Accepted {
        source: Box<dyn FrameSource>,
        outbound: PusherChannel,
    },
    /// Read-only query, answered from inside the loop.
    Snapshot(oneshot::Sender<RegistrySnapshot>),
}

/// One undecoded frame from a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub connection_id: ConnectionId,
    pub raw: Vec<u8>,
}

/// A reader observed EOF or a read error. Sent at most once per connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionClosed {
    pub connection_id: ConnectionId,
    pub reason: TransportError,
}
