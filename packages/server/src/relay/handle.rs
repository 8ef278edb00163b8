//! Listener-side handle to the relay loop.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{FrameSource, PusherChannel},
    usecase::RegistrySnapshot,
};

use super::event::ListenerEvent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("relay loop has stopped")]
    Stopped,
}

/// Cheap to clone. The loop keeps accepting connections while at least one
/// handle is alive.
#[derive(Debug, Clone)]
pub struct RelayHandle {
    listener: mpsc::UnboundedSender<ListenerEvent>,
}

impl RelayHandle {
    pub(crate) fn new(listener: mpsc::UnboundedSender<ListenerEvent>) -> Self {
        Self { listener }
    }

    /// Hand an accepted connection over to the relay.
    ///
    /// # Arguments
    ///
    /// * `source` - Inbound frames of the connection
    /// * `outbound` - Channel drained into the connection by its writer task
    pub fn accept(
        &self,
        source: Box<dyn FrameSource>,
        outbound: PusherChannel,
    ) -> Result<(), RelayError> {
        self.listener
            .send(ListenerEvent::Accepted { source, outbound })
            .map_err(|_| RelayError::Stopped)
    }

    /// Ask the relay for a snapshot of its current state.
    pub async fn snapshot(&self) -> Result<RegistrySnapshot, RelayError> {
        let (tx, rx) = oneshot::channel();
        self.listener
            .send(ListenerEvent::Snapshot(tx))
            .map_err(|_| RelayError::Stopped)?;
        rx.await.map_err(|_| RelayError::Stopped)
    }
}
