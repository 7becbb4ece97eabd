/// Backpressure bound on the per-socket control channel. Senders block
/// once a client this far behind stops draining its queue
pub const WEBSOCKET_CHANNEL_BOUND: usize = 64;
