//! Connection id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use super::value_object::ConnectionId;

/// Issues unique, monotonically increasing [`ConnectionId`]s.
///
/// Safe to share between threads. Constructed explicitly and handed to the
/// relay loop, so tests can start from a known value.
#[derive(Debug)]
pub struct ConnectionIdFactory {
    next: AtomicU64,
}

impl Default for ConnectionIdFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionIdFactory {
    /// Create a factory whose first id is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn generate(&self) -> ConnectionId {
        ConnectionId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
