mod message;
pub use message::*;

mod rtc;
pub use rtc::*;

mod room;
pub use room::*;
