//! WebSocket frame DTOs.
//!
//! Every frame is an envelope `{"type": <tag>, "data": <payload>}`. Tags and
//! payload field names are the compatibility contract with clients and must
//! not change.

use serde::{Deserialize, Serialize};

pub const JOIN_ROOM: &str = "JOIN_ROOM";
pub const LEAVE_ROOM: &str = "LEAVE_ROOM";
pub const TEXT: &str = "TEXT";

pub const SUCCESS_JOIN_ROOM: &str = "SUCCESS_JOIN_ROOM";
pub const SUCCESS_LEAVE_ROOM: &str = "SUCCESS_LEAVE_ROOM";
pub const CLIENT_LIST: &str = "CLIENT_LIST";
pub const TEXT_BROADCAST: &str = "TEXT_BROADCAST";
pub const REJECTED: &str = "REJECTED";

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "JOIN_ROOM")]
    JoinRoom(JoinRoomPayload),
    #[serde(rename = "LEAVE_ROOM")]
    LeaveRoom(RoomPayload),
    #[serde(rename = "TEXT")]
    Text(TextPayload),
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "SUCCESS_JOIN_ROOM")]
    SuccessJoinRoom(RoomPayload),
    #[serde(rename = "SUCCESS_LEAVE_ROOM")]
    SuccessLeaveRoom(RoomPayload),
    #[serde(rename = "CLIENT_LIST")]
    ClientList(ClientListPayload),
    #[serde(rename = "TEXT_BROADCAST")]
    TextBroadcast(TextBroadcastPayload),
    #[serde(rename = "REJECTED")]
    Rejected(RejectedPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_name: String,
    pub client_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub room_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPayload {
    pub room_name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListPayload {
    pub room_name: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBroadcastPayload {
    pub room_name: String,
    pub sender_name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedPayload {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_client_list_envelope_shape() {
        // テスト項目: CLIENT_LIST が {type, data} 形式で camelCase のフィールド名になる
        // given (前提条件):
        let msg = ServerMessage::ClientList(ClientListPayload {
            room_name: "lobby".to_string(),
            names: vec!["alice".to_string(), "bob".to_string()],
        });

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "CLIENT_LIST", "data": {"roomName": "lobby", "names": ["alice", "bob"]}})
        );
    }

    #[test]
    fn test_text_broadcast_envelope_shape() {
        // テスト項目: TEXT_BROADCAST のフィールド名が契約通りになる
        // given (前提条件):
        let msg = ServerMessage::TextBroadcast(TextBroadcastPayload {
            room_name: "lobby".to_string(),
            sender_name: "alice".to_string(),
            body: "hi".to_string(),
        });

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "TEXT_BROADCAST", "data": {"roomName": "lobby", "senderName": "alice", "body": "hi"}})
        );
    }

    #[test]
    fn test_rejected_omits_absent_detail() {
        // テスト項目: detail が無い REJECTED では detail フィールドが省略される
        // given (前提条件):
        let msg = ServerMessage::Rejected(RejectedPayload {
            reason: "not a member".to_string(),
            detail: None,
        });

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "REJECTED", "data": {"reason": "not a member"}})
        );
    }

    #[test]
    fn test_client_message_envelope_shape() {
        // テスト項目: クライアント送信用 JOIN_ROOM が契約通りの形になる
        // given (前提条件):
        let msg = ClientMessage::JoinRoom(JoinRoomPayload {
            room_name: "lobby".to_string(),
            client_name: "alice".to_string(),
        });

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "JOIN_ROOM", "data": {"roomName": "lobby", "clientName": "alice"}})
        );
    }
}
