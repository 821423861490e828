//! 환경 변수 기반 설정 관리

use std::env;
use std::str::FromStr;

/// 서버 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub room: RoomConfig,
    pub log_level: String,
}

/// 방 설정
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// 동시에 존재할 수 있는 최대 방 개수
    pub max_rooms: usize,
    /// 한 번도 입장하지 않은 방을 정리하기까지의 시간 (ms)
    pub idle_timeout_ms: u64,
    /// 정리 스케줄러 주기 (초)
    pub cleanup_interval_secs: u64,
    /// 채팅 메시지 최대 길이 (문자 수)
    pub max_message_length: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_rooms: 1000,
            idle_timeout_ms: 600_000,
            cleanup_interval_secs: 60,
            max_message_length: 2000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8081,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            room: RoomConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        Self {
            port: env_or("PORT", defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins: env::var("FRONTEND_URL")
                .map(|v| parse_origins(&v))
                .ok()
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_origins),
            room: RoomConfig {
                max_rooms: env_or("MAX_ROOMS", defaults.room.max_rooms),
                idle_timeout_ms: env_or("ROOM_IDLE_TIMEOUT", defaults.room.idle_timeout_ms),
                cleanup_interval_secs: env_or(
                    "ROOM_CLEANUP_INTERVAL",
                    defaults.room.cleanup_interval_secs,
                ),
                max_message_length: env_or(
                    "MAX_MESSAGE_LENGTH",
                    defaults.room.max_message_length,
                ),
            },
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}

/// 값이 없거나 파싱에 실패하면 기본값 사용
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 쉼표로 구분된 origin 목록
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
