//! 방 관련 에러 정의

use thiserror::Error;

/// 호출자에게 이벤트로 전달되는 복구 가능한 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room not found")]
    RoomNotFound,

    #[error("cannot create more rooms due to limit")]
    CapacityExceeded,

    #[error("already joined room {room_code}")]
    AlreadyJoined { room_code: String },

    #[error("not a member of this room")]
    NotAMember,

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl RoomError {
    /// 클라이언트에 내려가는 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            RoomError::RoomNotFound => "ROOM_NOT_FOUND",
            RoomError::CapacityExceeded => "CAPACITY_EXCEEDED",
            RoomError::AlreadyJoined { .. } => "ALREADY_JOINED",
            RoomError::NotAMember => "NOT_A_MEMBER",
            RoomError::InvalidMessage(_) => "INVALID_MESSAGE",
            RoomError::InvalidPayload(_) => "INVALID_PAYLOAD",
        }
    }
}
