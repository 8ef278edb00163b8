//! Room-based WebSocket relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server
//! cargo run --bin roomcast-server -- --host 0.0.0.0 --port 3000 --path /chat
//! ```

use clap::Parser;
use roomcast_server::ui::{Server, ServerConfig};
use roomcast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "roomcast-server")]
#[command(about = "Room-based WebSocket message relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// URL path of the WebSocket endpoint
    #[arg(long, default_value = "/ws")]
    path: String,
}

#[tokio::main]
async fn main() {
    setup_logger("roomcast_server", env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        path: args.path,
    };

    if let Err(e) = Server::new(config).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
