//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{
        SessionState, should_attempt_reconnect, should_exit_immediately,
        should_reset_reconnect_count,
    },
    error::ClientError,
    session::run_client_session,
    ui::spawn_input_thread,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the client with reconnection logic
///
/// # Arguments
///
/// * `url` - WebSocket URL of the server
/// * `name` - Display name used by `/join` when none is given
/// * `room` - Room to join once connected
pub async fn run_client(
    url: String,
    name: String,
    room: Option<String>,
) -> Result<(), ClientError> {
    let prompt = format!("{}> ", name);
    let mut input = spawn_input_thread(prompt.clone());
    let mut state = SessionState::new(name, room);
    let mut reconnect_count = 0;

    loop {
        tracing::info!("Attempting to connect to {}", url);

        match run_client_session(&url, &mut state, &mut input, &prompt).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    return Err(e);
                }
                if should_reset_reconnect_count(&e, &state) {
                    reconnect_count = 0;
                }
                tracing::warn!("{}", e);

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    return Err(ClientError::ReconnectFailed(MAX_RECONNECT_ATTEMPTS));
                }
                reconnect_count += 1;

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count,
                    MAX_RECONNECT_ATTEMPTS
                );
                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
