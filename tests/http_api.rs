use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chatty_relay::protocol::CreateRoomResponse;
use chatty_relay::{server, AppState, Config};
use std::sync::Arc;
use tower::ServiceExt;

fn app_state(max_rooms: usize) -> Arc<AppState> {
    let mut config = Config::default();
    config.room.max_rooms = max_rooms;
    Arc::new(AppState::from_config(config))
}

async fn create_room(state: &Arc<AppState>) -> (StatusCode, Vec<u8>) {
    let response = server::build_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/rooms/create")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn room_status(state: &Arc<AppState>, room_code: &str) -> StatusCode {
    server::build_router(state.clone())
        .oneshot(
            Request::builder()
                .uri(format!("/api/rooms/{}", room_code))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn create_then_query_room() {
    let state = app_state(10);

    let (status, body) = create_room(&state).await;
    assert_eq!(status, StatusCode::OK);
    let created: CreateRoomResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(created.room_code.len(), 8);

    assert_eq!(room_status(&state, &created.room_code).await, StatusCode::OK);
    assert_eq!(room_status(&state, "missing0").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_beyond_capacity_is_bad_request() {
    let state = app_state(2);
    assert_eq!(create_room(&state).await.0, StatusCode::OK);
    assert_eq!(create_room(&state).await.0, StatusCode::OK);

    let (status, body) = create_room(&state).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "cannot create more rooms due to limit"
    );
    assert_eq!(state.registry.room_count(), 2);
}

#[tokio::test]
async fn health_reports_room_count() {
    let state = app_state(10);
    create_room(&state).await;

    let response = server::build_router(state.clone())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["rooms"], 1);
    assert_eq!(json["max_rooms"], 10);
}
