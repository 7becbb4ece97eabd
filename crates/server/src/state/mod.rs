mod state;
pub use state::*;

// impl-only module, nothing to re-export
mod pool;

mod rooms;
pub use rooms::*;

mod websocket;
pub use websocket::*;
