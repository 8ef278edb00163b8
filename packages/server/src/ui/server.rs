//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use roomcast_shared::time::SystemClock;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::ConnectionIdFactory,
    infrastructure::message_pusher::WebSocketMessagePusher,
    relay::{RelayHandle, RelayLoop},
};

use super::{
    error::ServerError,
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PATH: &str = "/ws";

/// Listen address and upgrade path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// URL path of the WebSocket upgrade endpoint
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate_path(&self) -> Result<(), ServerError> {
        let path = self.path.as_str();
        let routable = path.starts_with('/')
            && path != "/"
            && path != "/api"
            && !path.starts_with("/api/")
            && !path.contains(['{', '}', '*']);
        if routable {
            Ok(())
        } else {
            Err(ServerError::InvalidPath(self.path.clone()))
        }
    }
}

/// Room relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(ServerConfig::default());
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind the configured address and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// * `ServerError::InvalidPath` - the upgrade path cannot be routed
    /// * `ServerError::Bind` - the address could not be bound
    pub async fn run(self) -> Result<(), ServerError> {
        self.config.validate_path()?;

        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        tracing::info!("Connect to: ws://{}{}", addr, self.config.path);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.config.validate_path()?;

        let (relay, handle) = RelayLoop::new(
            WebSocketMessagePusher::new(),
            ConnectionIdFactory::new(),
            Arc::new(SystemClock),
        );
        relay.spawn();

        let app = build_router(&self.config.path, handle);

        tracing::info!("Room relay server listening on {}", listener.local_addr()?);

        // Dropping the router releases the last RelayHandle; the relay loop
        // then exits once the remaining WebSocket connections close.
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Routes of the server, bound to a running relay.
pub fn build_router(ws_path: &str, relay: RelayHandle) -> Router {
    let app_state = Arc::new(AppState { relay });

    Router::new()
        // WebSocket エンドポイント
        .route(ws_path, get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
