//! Chatty 채팅방 릴레이 서버
//!
//! 짧은 수명의 방(room)을 만들고, 지속 연결로 들어온 사용자들 사이에 메시지를 중계한다.
//! 마지막 멤버가 나가면 방은 자동으로 삭제된다.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use state::AppState;
