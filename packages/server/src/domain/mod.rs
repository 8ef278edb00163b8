//! Domain layer for the relay.
//!
//! This module holds the chat state (rooms, connections, the registry that
//! owns them) and the seams through which the relay talks to the transport.
//! Nothing in here performs I/O.

pub mod entity;
pub mod error;
pub mod event;
pub mod frame_source;
pub mod id_factory;
pub mod message_pusher;
pub mod registry;
pub mod value_object;

pub use entity::{Connection, Room};
pub use error::{MessagePushError, RoomError, TransportError, ValueObjectError};
pub use event::{ClientEvent, ServerEvent};
pub use frame_source::FrameSource;
pub use id_factory::ConnectionIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::{JoinOutcome, LeaveOutcome, Registry};
pub use value_object::{ConnectionId, DisplayName, MessageBody, RoomName};
