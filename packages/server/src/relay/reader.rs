//! Connection reader: one task per live connection.

use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{ConnectionId, FrameSource};

use super::event::{ConnectionClosed, InboundFrame};

/// Pumps frames from a [`FrameSource`] into the relay loop.
///
/// Frames are forwarded undecoded and in arrival order. When the source
/// fails the reader sends one [`ConnectionClosed`] and stops; nothing is
/// forwarded for that id afterwards.
pub struct ConnectionReader {
    connection_id: ConnectionId,
    source: Box<dyn FrameSource>,
    frames: mpsc::UnboundedSender<InboundFrame>,
    closes: mpsc::UnboundedSender<ConnectionClosed>,
}

impl ConnectionReader {
    pub fn new(
        connection_id: ConnectionId,
        source: Box<dyn FrameSource>,
        frames: mpsc::UnboundedSender<InboundFrame>,
        closes: mpsc::UnboundedSender<ConnectionClosed>,
    ) -> Self {
        Self {
            connection_id,
            source,
            frames,
            closes,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        let reason = loop {
            match self.source.receive_frame().await {
                Ok(raw) => {
                    let frame = InboundFrame {
                        connection_id: self.connection_id,
                        raw,
                    };
                    if self.frames.send(frame).is_err() {
                        // relay loop is gone
                        return;
                    }
                }
                Err(e) => break e,
            }
        };

        tracing::debug!("Reader for connection {} finished: {}", self.connection_id, reason);
        let _ = self.closes.send(ConnectionClosed {
            connection_id: self.connection_id,
            reason,
        });
    }
}
