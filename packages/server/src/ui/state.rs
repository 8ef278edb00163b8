//! Shared application state.

use crate::relay::RelayHandle;

/// Shared application state
///
/// Handlers never touch chat state directly; they talk to the relay loop.
pub struct AppState {
    pub relay: RelayHandle,
}
