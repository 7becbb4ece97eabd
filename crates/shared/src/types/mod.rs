mod uuid;
pub use uuid::*;

mod json;
pub use json::*;

pub mod rtc;
pub mod websocket;
