//! 애플리케이션 상태 관리

use crate::broadcast::BroadcastGroups;
use crate::config::Config;
use crate::registry::RoomRegistry;
use std::sync::Arc;

/// 전역 애플리케이션 상태
pub struct AppState {
    /// 방 레지스트리 (외부에서 주입)
    pub registry: Arc<RoomRegistry>,
    /// 브로드캐스트 그룹과 연결별 송신 채널
    pub groups: BroadcastGroups,
    /// 설정
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, registry: Arc<RoomRegistry>) -> Self {
        Self {
            registry,
            groups: BroadcastGroups::new(),
            config: Arc::new(config),
        }
    }

    /// 설정값으로 레지스트리를 만들어 상태 생성
    pub fn from_config(config: Config) -> Self {
        let registry = Arc::new(RoomRegistry::new(config.room.max_rooms));
        Self::new(config, registry)
    }
}
