//! WebSocket 전송 계층 연결부

use crate::error::RoomError;
use crate::handlers::{connection, room};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // 연결 처리
    let connection_id = connection::handle_connection(&state, tx);

    // 송신 태스크
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!(error = %e, "Failed to encode server message"),
            }
        }
    });

    // 수신 처리
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => handle_text_frame(&state, &connection_id, &text),
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    // 연결 해제
    connection::handle_disconnect(&state, &connection_id);
    send_task.abort();
}

/// 텍스트 프레임 디코딩 후 디스패치. 디코딩 실패 시 보낸 연결에만 에러 전송
pub fn handle_text_frame(state: &AppState, connection_id: &str, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => handle_client_message(state, connection_id, msg),
        Err(e) => {
            let err = RoomError::InvalidPayload(e.to_string());
            tracing::debug!(connection_id = %connection_id, error = %err, "Invalid payload");
            state.groups.send_to(connection_id, ServerMessage::from(&err));
        }
    }
}

/// 인바운드 명령 디스패치
pub fn handle_client_message(state: &AppState, connection_id: &str, msg: ClientMessage) {
    match msg {
        ClientMessage::Heartbeat => {
            connection::handle_heartbeat(state, connection_id);
        }
        ClientMessage::JoinRoom {
            room_code,
            user_name,
        } => {
            room::handle_join_room(state, connection_id, &room_code, &user_name);
        }
        ClientMessage::LeaveRoom => {
            room::handle_leave_room(state, connection_id);
        }
        ClientMessage::SendMessage {
            room_code,
            user_name,
            message,
        } => {
            room::handle_send_message(state, connection_id, &room_code, &user_name, &message);
        }
    }
}
