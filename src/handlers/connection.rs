//! 연결 핸들러

use crate::handlers::room::LeaveOutcome;
use crate::protocol::ServerMessage;
use crate::state::AppState;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// 새 연결 처리
pub fn handle_connection(state: &AppState, sender: UnboundedSender<ServerMessage>) -> String {
    let connection_id = Uuid::new_v4().to_string();

    state.groups.register(&connection_id, sender);
    state.groups.send_to(
        &connection_id,
        ServerMessage::Connected {
            connection_id: connection_id.clone(),
        },
    );

    tracing::info!(connection_id = %connection_id, "New connection established");
    connection_id
}

/// 연결 해제 처리
pub fn handle_disconnect(state: &AppState, connection_id: &str) -> Option<LeaveOutcome> {
    let outcome = crate::handlers::room::leave_room_internal(state, connection_id);
    state.groups.unregister(connection_id);
    tracing::info!(connection_id = %connection_id, "Connection closed");
    outcome
}

/// Heartbeat 처리
pub fn handle_heartbeat(state: &AppState, connection_id: &str) {
    state.groups.send_to(connection_id, ServerMessage::HeartbeatAck);
}
