//! The relay actor.
//!
//! [`RelayLoop`] is the only owner of the [`Registry`](crate::domain::Registry).
//! Everything else talks to it over channels:
//!
//! - the listener side (HTTP handlers) holds a [`RelayHandle`] and sends
//!   accepted connections and snapshot requests,
//! - one [`ConnectionReader`] per connection forwards raw frames, followed by
//!   exactly one close notification.
//!
//! Events are applied one at a time, so no lock guards the registry.

pub mod event;
pub mod event_loop;
pub mod handle;
pub mod reader;

pub use event::{ConnectionClosed, InboundFrame, ListenerEvent};
pub use event_loop::RelayLoop;
pub use handle::{RelayError, RelayHandle};
pub use reader::ConnectionReader;
