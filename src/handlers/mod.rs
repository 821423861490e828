//! 핸들러 모듈

pub mod api;
pub mod connection;
pub mod room;
pub mod ws;

pub use api::*;
pub use connection::*;
pub use room::*;
pub use ws::*;
