//! 방 관리 핸들러

use crate::error::RoomError;
use crate::protocol::ServerMessage;
use crate::registry::AddOutcome;
use crate::state::AppState;
use std::time::Duration;

/// 방 참여 처리
pub fn handle_join_room(state: &AppState, connection_id: &str, room_code: &str, user_name: &str) {
    let room_code = room_code.trim();

    if !state.registry.room_exists(room_code) {
        reject(state, connection_id, &RoomError::RoomNotFound);
        return;
    }

    // 방 존재 확인 이후 삭제된 경우도 여기서 RoomNotFound 로 걸러진다
    match state.registry.add_member(room_code, connection_id) {
        Ok(AddOutcome::Added) => {}
        Ok(AddOutcome::AlreadyMember) => {
            let err = RoomError::AlreadyJoined {
                room_code: room_code.to_string(),
            };
            reject(state, connection_id, &err);
            return;
        }
        Err(err) => {
            reject(state, connection_id, &err);
            return;
        }
    }

    state.groups.subscribe(room_code, connection_id);

    // 기존 사용자들에게 새 사용자 알림
    let notified = state.groups.broadcast_except(
        room_code,
        connection_id,
        ServerMessage::UserJoined {
            user_name: user_name.to_string(),
        },
    );

    state.groups.send_to(
        connection_id,
        ServerMessage::JoinedRoom {
            room_code: room_code.to_string(),
        },
    );

    tracing::info!(
        connection_id = %connection_id,
        room_code = %room_code,
        notified = notified,
        "User joined room"
    );
}

/// 방 나가기 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 남은 멤버에게 UserLeft 전송
    Left { room_code: String, notified: usize },
    /// 마지막 멤버가 나가서 방 삭제, RoomDeconstructed 전송
    Deconstructed { room_code: String, recipients: usize },
}

impl LeaveOutcome {
    pub fn room_code(&self) -> &str {
        match self {
            LeaveOutcome::Left { room_code, .. } => room_code,
            LeaveOutcome::Deconstructed { room_code, .. } => room_code,
        }
    }
}

/// 방 나가기 내부 로직. 방에 속해 있지 않았으면 None
///
/// 구독 해지를 레지스트리 제거보다 먼저 해서, 구독 중인 연결은 항상 같은 방의 멤버다.
pub fn leave_room_internal(state: &AppState, connection_id: &str) -> Option<LeaveOutcome> {
    let room_code = state.registry.find_room_of(connection_id)?;

    state.groups.unsubscribe(&room_code, connection_id);
    let removal = state.registry.remove_member(&room_code, connection_id);

    if removal.room_deconstructed {
        // 마지막 멤버였으므로 보통 수신자는 없다
        let recipients = state
            .groups
            .broadcast(&room_code, ServerMessage::room_deconstructed(&room_code));
        tracing::info!(
            connection_id = %connection_id,
            room_code = %room_code,
            recipients = recipients,
            "Last member left, room deconstructed"
        );
        Some(LeaveOutcome::Deconstructed {
            room_code,
            recipients,
        })
    } else if removal.removed {
        let notified = state.groups.broadcast(
            &room_code,
            ServerMessage::UserLeft {
                connection_id: connection_id.to_string(),
            },
        );
        tracing::info!(
            connection_id = %connection_id,
            room_code = %room_code,
            notified = notified,
            "User left room"
        );
        Some(LeaveOutcome::Left {
            room_code,
            notified,
        })
    } else {
        None
    }
}

/// 방 나가기 처리
pub fn handle_leave_room(state: &AppState, connection_id: &str) {
    match leave_room_internal(state, connection_id) {
        Some(outcome) => {
            state.groups.send_to(
                connection_id,
                ServerMessage::LeftRoom {
                    room_code: outcome.room_code().to_string(),
                },
            );
        }
        None => {
            tracing::debug!(connection_id = %connection_id, "Leave requested while not in a room");
        }
    }
}

/// 채팅 메시지 브로드캐스트 (보낸 사람 포함)
pub fn handle_send_message(
    state: &AppState,
    connection_id: &str,
    room_code: &str,
    user_name: &str,
    message: &str,
) {
    let room_code = room_code.trim();

    if let Err(err) = validate_message(message, state.config.room.max_message_length) {
        reject(state, connection_id, &err);
        return;
    }

    if state.registry.find_room_of(connection_id).as_deref() != Some(room_code) {
        reject(state, connection_id, &RoomError::NotAMember);
        return;
    }
    debug_assert!(
        state.groups.is_subscribed(room_code, connection_id),
        "room member must be subscribed to its broadcast group"
    );

    let delivered = state.groups.broadcast(
        room_code,
        ServerMessage::ReceiveMessage {
            user_name: user_name.to_string(),
            message: message.to_string(),
        },
    );

    tracing::debug!(
        connection_id = %connection_id,
        room_code = %room_code,
        delivered = delivered,
        "Relayed message"
    );
}

fn validate_message(message: &str, max_length: usize) -> Result<(), RoomError> {
    if message.trim().is_empty() {
        return Err(RoomError::InvalidMessage("message is empty".to_string()));
    }
    if message.chars().count() > max_length {
        return Err(RoomError::InvalidMessage(format!(
            "message exceeds {} characters",
            max_length
        )));
    }
    Ok(())
}

/// 요청한 연결에게만 에러 전송
fn reject(state: &AppState, connection_id: &str, err: &RoomError) {
    tracing::warn!(connection_id = %connection_id, error = %err, "Rejected room request");
    state.groups.send_to(connection_id, ServerMessage::from(err));
}

/// 입장 없이 방치된 방 정리
pub fn cleanup_idle_rooms(state: &AppState) -> usize {
    let max_idle = Duration::from_millis(state.config.room.idle_timeout_ms);
    let deleted = state.registry.reap_idle_rooms(max_idle);

    if deleted > 0 {
        tracing::info!(deleted_rooms = deleted, "Cleanup completed");
    }
    deleted
}
