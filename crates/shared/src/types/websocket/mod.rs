mod server;
pub use server::*;

mod client;
pub use client::*;

mod message_error;
pub use message_error::*;

mod sdp_type;
pub use sdp_type::*;

mod sdp;
pub use sdp::*;

mod ice_candidate;
pub use ice_candidate::*;
