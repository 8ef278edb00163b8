//! Conversion logic between DTOs and domain types.

use roomcast_shared::time::millis_to_rfc3339;

use crate::{
    domain::{ClientEvent, ServerEvent},
    infrastructure::dto::{http::RoomSummaryDto, websocket as dto},
    usecase::RoomSnapshot,
};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientMessage> for ClientEvent {
    fn from(msg: dto::ClientMessage) -> Self {
        match msg {
            dto::ClientMessage::JoinRoom(p) => ClientEvent::JoinRoom {
                room_name: p.room_name,
                client_name: p.client_name,
            },
            dto::ClientMessage::LeaveRoom(p) => ClientEvent::LeaveRoom {
                room_name: p.room_name,
            },
            dto::ClientMessage::Text(p) => ClientEvent::Text {
                room_name: p.room_name,
                body: p.body,
            },
        }
    }
}

impl From<dto::ServerMessage> for ServerEvent {
    fn from(msg: dto::ServerMessage) -> Self {
        match msg {
            dto::ServerMessage::SuccessJoinRoom(p) => ServerEvent::JoinAccepted {
                room_name: p.room_name,
            },
            dto::ServerMessage::SuccessLeaveRoom(p) => ServerEvent::LeaveAccepted {
                room_name: p.room_name,
            },
            dto::ServerMessage::ClientList(p) => ServerEvent::RoomMembers {
                room_name: p.room_name,
                names: p.names,
            },
            dto::ServerMessage::TextBroadcast(p) => ServerEvent::TextBroadcast {
                room_name: p.room_name,
                sender_name: p.sender_name,
                body: p.body,
            },
            dto::ServerMessage::Rejected(p) => ServerEvent::Rejected {
                reason: p.reason,
                detail: p.detail,
            },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<ClientEvent> for dto::ClientMessage {
    fn from(event: ClientEvent) -> Self {
        match event {
            ClientEvent::JoinRoom {
                room_name,
                client_name,
            } => Self::JoinRoom(dto::JoinRoomPayload {
                room_name,
                client_name,
            }),
            ClientEvent::LeaveRoom { room_name } => Self::LeaveRoom(dto::RoomPayload { room_name }),
            ClientEvent::Text { room_name, body } => {
                Self::Text(dto::TextPayload { room_name, body })
            }
        }
    }
}

impl From<ServerEvent> for dto::ServerMessage {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::JoinAccepted { room_name } => {
                Self::SuccessJoinRoom(dto::RoomPayload { room_name })
            }
            ServerEvent::LeaveAccepted { room_name } => {
                Self::SuccessLeaveRoom(dto::RoomPayload { room_name })
            }
            ServerEvent::RoomMembers { room_name, names } => {
                Self::ClientList(dto::ClientListPayload { room_name, names })
            }
            ServerEvent::TextBroadcast {
                room_name,
                sender_name,
                body,
            } => Self::TextBroadcast(dto::TextBroadcastPayload {
                room_name,
                sender_name,
                body,
            }),
            ServerEvent::Rejected { reason, detail } => {
                Self::Rejected(dto::RejectedPayload { reason, detail })
            }
        }
    }
}

impl From<RoomSnapshot> for RoomSummaryDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            name: snapshot.name,
            members: snapshot.members,
            created_at: millis_to_rfc3339(snapshot.created_at),
        }
    }
}
