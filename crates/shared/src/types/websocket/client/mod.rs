mod message;
pub use message::*;

mod rtc;
pub use rtc::*;
