//! Interactive Roomcast client.
//!
//! Connects to a relay server, joins rooms and sends each typed line to the
//! current room. Automatically reconnects on disconnection (max 5 attempts
//! with 5 second interval) and rejoins the rooms it was in.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-client -- --name alice --room lobby
//! cargo run --bin roomcast-client -- -n bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use roomcast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "roomcast-client")]
#[command(about = "Interactive client for the Roomcast room relay", long_about = None)]
struct Args {
    /// Display name used when joining rooms
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Room to join once connected
    #[arg(short = 'r', long)]
    room: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logger("roomcast_client", env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = roomcast_client::run_client(args.url, args.name, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
