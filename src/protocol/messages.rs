//! 클라이언트-서버 메시지 프로토콜 정의

use crate::error::RoomError;
use serde::{Deserialize, Serialize};

/// 클라이언트 → 서버 메시지
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    // Connection
    Heartbeat,

    // Room
    JoinRoom {
        room_code: String,
        user_name: String,
    },
    LeaveRoom,

    // Chat
    SendMessage {
        room_code: String,
        user_name: String,
        message: String,
    },
}

/// 서버 → 클라이언트 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    // Connection
    Connected { connection_id: String },
    HeartbeatAck,
    Error { code: String, message: String },

    // Room Events
    JoinedRoom { room_code: String },
    LeftRoom { room_code: String },
    UserJoined { user_name: String },
    UserLeft { connection_id: String },
    RoomDeconstructed { room_code: String, message: String },

    // Chat
    ReceiveMessage { user_name: String, message: String },
}

impl ServerMessage {
    pub fn room_deconstructed(room_code: &str) -> Self {
        ServerMessage::RoomDeconstructed {
            room_code: room_code.to_string(),
            message: format!("Room {} has been deconstructed", room_code),
        }
    }
}

impl From<&RoomError> for ServerMessage {
    fn from(err: &RoomError) -> Self {
        ServerMessage::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// 방 생성 응답 (HTTP)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_join_room_command() {
        let raw = json!({
            "type": "JoinRoom",
            "payload": { "room_code": "a1b2c3d4", "user_name": "A" }
        });
        let msg: ClientMessage = serde_json::from_value(raw).unwrap();
        match msg {
            ClientMessage::JoinRoom {
                room_code,
                user_name,
            } => {
                assert_eq!(room_code, "a1b2c3d4");
                assert_eq!(user_name, "A");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn decodes_unit_commands_without_payload() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"LeaveRoom"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::LeaveRoom));
    }

    #[test]
    fn encodes_receive_message_event() {
        let event = ServerMessage::ReceiveMessage {
            user_name: "A".to_string(),
            message: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "ReceiveMessage",
                "payload": { "user_name": "A", "message": "hi" }
            })
        );
    }

    #[test]
    fn room_error_maps_to_error_event() {
        let event = ServerMessage::from(&RoomError::RoomNotFound);
        assert_eq!(
            event,
            ServerMessage::Error {
                code: "ROOM_NOT_FOUND".to_string(),
                message: "room not found".to_string(),
            }
        );
    }

    #[test]
    fn create_room_response_uses_camel_case() {
        let body = CreateRoomResponse {
            room_code: "a1b2c3d4".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "roomCode": "a1b2c3d4" })
        );
    }
}
