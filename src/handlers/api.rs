//! HTTP 사이드 채널 핸들러 (방 생성 / 존재 확인)

use crate::protocol::CreateRoomResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub async fn index_handler() -> &'static str {
    "Chatty relay online"
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server": "chatty-relay",
        "rooms": state.registry.room_count(),
        "max_rooms": state.registry.max_rooms(),
        "connections": state.groups.connection_count(),
        "timestamp": SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }))
}

/// 방 생성
pub async fn create_room_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.registry.create_room() {
        Ok(room_code) => Json(CreateRoomResponse { room_code }).into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

/// 방 존재 확인
pub async fn room_exists_handler(
    State(state): State<Arc<AppState>>,
    Path(room_code): Path<String>,
) -> StatusCode {
    if state.registry.room_exists(room_code.trim()) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}
