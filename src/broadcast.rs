//! 브로드캐스트 그룹
//!
//! 방 코드 -> 구독 중인 연결 집합. 전송 전용이며 레지스트리 멤버십과는 별도로 관리된다.
//! 구독/해지는 그룹 샤드 락 안에서 처리되므로 전송 시점의 구독자 스냅샷은 항상 일관된다.

use crate::protocol::ServerMessage;
use dashmap::DashMap;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Default)]
pub struct BroadcastGroups {
    /// 연결별 송신 채널 (connection_id -> sender)
    sessions: DashMap<String, UnboundedSender<ServerMessage>>,
    /// 그룹 구독자 (room_code -> connection_id 집합)
    groups: DashMap<String, HashSet<String>>,
}

impl BroadcastGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, connection_id: &str, sender: UnboundedSender<ServerMessage>) {
        self.sessions.insert(connection_id.to_string(), sender);
    }

    pub fn unregister(&self, connection_id: &str) {
        self.sessions.remove(connection_id);
    }

    pub fn connection_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn subscribe(&self, room_code: &str, connection_id: &str) {
        self.groups
            .entry(room_code.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    /// 구독 해지. 그룹이 비면 그룹도 제거
    pub fn unsubscribe(&self, room_code: &str, connection_id: &str) -> bool {
        let mut removed = false;
        self.groups.remove_if_mut(room_code, |_, subscribers| {
            removed = subscribers.remove(connection_id);
            subscribers.is_empty()
        });
        removed
    }

    /// 구독자 스냅샷
    pub fn subscribers(&self, room_code: &str) -> HashSet<String> {
        self.groups
            .get(room_code)
            .map(|subscribers| subscribers.clone())
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, room_code: &str, connection_id: &str) -> bool {
        self.groups
            .get(room_code)
            .is_some_and(|subscribers| subscribers.contains(connection_id))
    }

    /// 특정 연결에 메시지 전송
    pub fn send_to(&self, connection_id: &str, message: ServerMessage) -> bool {
        match self.sessions.get(connection_id) {
            Some(sender) => sender.send(message).is_ok(),
            None => false,
        }
    }

    /// 그룹 전체에 브로드캐스트. 전달된 수신자 수 반환
    pub fn broadcast(&self, room_code: &str, message: ServerMessage) -> usize {
        self.deliver(self.subscribers(room_code), None, message)
    }

    /// 특정 연결을 제외하고 브로드캐스트
    pub fn broadcast_except(
        &self,
        room_code: &str,
        except_connection_id: &str,
        message: ServerMessage,
    ) -> usize {
        self.deliver(
            self.subscribers(room_code),
            Some(except_connection_id),
            message,
        )
    }

    fn deliver(
        &self,
        recipients: HashSet<String>,
        except: Option<&str>,
        message: ServerMessage,
    ) -> usize {
        recipients
            .iter()
            .filter(|id| Some(id.as_str()) != except)
            .filter(|id| self.send_to(id, message.clone()))
            .count()
    }
}
