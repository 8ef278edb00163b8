//! Errors that stop the server.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The upgrade endpoint path cannot be routed.
    #[error("invalid WebSocket path '{0}': must start with '/', must not be '/' or under '/api', and must not contain '{{', '}}' or '*'")]
    InvalidPath(String),

    /// The listener could not be bound. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}
