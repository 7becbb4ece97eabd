mod signalling_state;
pub use signalling_state::*;
