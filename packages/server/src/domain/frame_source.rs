//! Inbound half of the transport seam.

use async_trait::async_trait;

use super::TransportError;

/// A stream of discrete frames from one connection.
#[async_trait]
pub trait FrameSource: Send {
    /// Wait for the next frame.
    ///
    /// Returns [`TransportError::Closed`] on EOF; after any error the source
    /// is finished.
    async fn receive_frame(&mut self) -> Result<Vec<u8>, TransportError>;
}
