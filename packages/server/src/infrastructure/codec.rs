//! Protocol codec: raw frames ⇄ typed events.
//!
//! Inbound parsing is done by hand on top of `serde_json::Value` so each
//! failure maps to a distinct [`ParseError`] (malformed syntax, unknown type
//! tag, missing field). Outbound encoding goes through the serde DTOs.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    domain::{ClientEvent, ServerEvent},
    infrastructure::dto::websocket::{self as dto, ClientMessage, ServerMessage},
};

/// Fallback frame if serialization ever fails. The DTOs only hold strings, so
/// this is not expected to be sent.
const ENCODE_FAILURE_FRAME: &str = r#"{"type":"REJECTED","data":{"reason":"internal error"}}"#;

/// Why an inbound frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not valid JSON, not an object, or a field has the wrong JSON type.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The `type` tag is not one this side understands.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// A field required by the envelope or the variant is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

/// Decode a client frame.
pub fn parse(raw: &[u8]) -> Result<ClientEvent, ParseError> {
    let (tag, data) = open_envelope(raw)?;

    match tag.as_str() {
        dto::JOIN_ROOM => {
            let data = require_data(data)?;
            Ok(ClientEvent::JoinRoom {
                room_name: required_str(&data, "roomName")?,
                client_name: required_str(&data, "clientName")?,
            })
        }
        dto::LEAVE_ROOM => {
            let data = require_data(data)?;
            Ok(ClientEvent::LeaveRoom {
                room_name: required_str(&data, "roomName")?,
            })
        }
        dto::TEXT => {
            let data = require_data(data)?;
            Ok(ClientEvent::Text {
                room_name: required_str(&data, "roomName")?,
                body: required_str(&data, "body")?,
            })
        }
        _ => Err(ParseError::UnknownType(tag)),
    }
}

/// Encode a server event into a frame.
pub fn encode(event: &ServerEvent) -> String {
    let msg = ServerMessage::from(event.clone());
    serde_json::to_string(&msg).unwrap_or_else(|e| {
        tracing::error!("Failed to encode server event {:?}: {}", event, e);
        ENCODE_FAILURE_FRAME.to_string()
    })
}

/// Encode a client event into a frame (client side of the protocol).
pub fn encode_client_event(event: &ClientEvent) -> String {
    let msg = ClientMessage::from(event.clone());
    serde_json::to_string(&msg).unwrap_or_else(|e| {
        tracing::error!("Failed to encode client event {:?}: {}", event, e);
        String::new()
    })
}

/// Decode a server frame (client side of the protocol).
pub fn decode_server_message(raw: &str) -> Result<ServerEvent, ParseError> {
    let (tag, _) = open_envelope(raw.as_bytes())?;
    match tag.as_str() {
        dto::SUCCESS_JOIN_ROOM
        | dto::SUCCESS_LEAVE_ROOM
        | dto::CLIENT_LIST
        | dto::TEXT_BROADCAST
        | dto::REJECTED => serde_json::from_str::<ServerMessage>(raw)
            .map(ServerEvent::from)
            .map_err(|e| ParseError::Malformed(e.to_string())),
        _ => Err(ParseError::UnknownType(tag)),
    }
}

/// Split a frame into its `type` tag and (possibly absent) `data` value.
fn open_envelope(raw: &[u8]) -> Result<(String, Option<Value>), ParseError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| ParseError::Malformed(e.to_string()))?;
    let Value::Object(mut envelope) = value else {
        return Err(ParseError::Malformed(
            "frame is not a JSON object".to_string(),
        ));
    };

    let tag = match envelope.remove("type") {
        Some(Value::String(tag)) => tag,
        Some(_) => {
            return Err(ParseError::Malformed("`type` must be a string".to_string()));
        }
        None => return Err(ParseError::MissingField("type")),
    };

    Ok((tag, envelope.remove("data")))
}

fn require_data(data: Option<Value>) -> Result<Map<String, Value>, ParseError> {
    match data {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ParseError::Malformed("`data` must be an object".to_string())),
        None => Err(ParseError::MissingField("data")),
    }
}

fn required_str(data: &Map<String, Value>, field: &'static str) -> Result<String, ParseError> {
    match data.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParseError::Malformed(format!("`{}` must be a string", field))),
        None => Err(ParseError::MissingField(field)),
    }
}
