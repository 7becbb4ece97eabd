use serde::{Deserialize, Serialize};

use super::ClientMessage;
use crate::types::websocket::{IceCandidate, Sdp};

/// Signalling traffic bound for the other seat. Rooms only ever hold two
/// peers so the target never needs naming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientRtc {
    /// Offer to start or renegotiate a session
    Offer { sdp: Sdp },
    /// Answer to a previously relayed offer
    Answer { sdp: Sdp },
    /// An ice candidate
    IceCandidate { candidate: IceCandidate },
}

impl From<ClientRtc> for ClientMessage {
    fn from(value: ClientRtc) -> Self {
        Self::Rtc(value)
    }
}
