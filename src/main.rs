//! Chatty 릴레이 서버 진입점

use chatty_relay::{handlers, server, AppState, Config, RoomRegistry};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = Arc::new(RoomRegistry::new(config.room.max_rooms));
    let state = Arc::new(AppState::new(config.clone(), registry));

    // 방치된 방 정리 스케줄러
    let cleanup_state = state.clone();
    let cleanup_interval = config.room.cleanup_interval_secs.max(1);
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(cleanup_interval));
        loop {
            interval.tick().await;
            handlers::cleanup_idle_rooms(&cleanup_state);
        }
    });

    let app = server::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Chatty relay server started");
    tracing::info!(max_rooms = config.room.max_rooms, "Address: {}", addr);
    tracing::info!("WebSocket: ws://{}/ws", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
