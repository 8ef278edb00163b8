//! Error types for the Roomcast client.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Client-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The server URL cannot be used for a WebSocket connection
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// The server answered the upgrade request with 404
    #[error("No WebSocket endpoint at '{0}'")]
    EndpointNotFound(String),

    /// Connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection went away
    #[error("Connection lost")]
    ConnectionLost,

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectFailed(u32),
}

impl ClientError {
    /// Classify a failed connection attempt.
    pub fn from_connect_error(url: &str, error: tungstenite::Error) -> Self {
        match error {
            tungstenite::Error::Url(e) => {
                tracing::debug!("URL rejected: {}", e);
                Self::InvalidUrl(url.to_string())
            }
            tungstenite::Error::Http(response) if response.status() == 404 => {
                Self::EndpointNotFound(url.to_string())
            }
            other => Self::ConnectionError(other.to_string()),
        }
    }
}
