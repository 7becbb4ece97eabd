use serde::{Deserialize, Serialize};

use super::ServerMessage;
use crate::types::{
    rtc::PeerId,
    websocket::{IceCandidate, Sdp},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServerRtc {
    /// An offer relayed from the other seat
    PeerOffer { sdp: Sdp, peer: PeerId },
    /// An answer relayed from the other seat
    PeerAnswer { sdp: Sdp, peer: PeerId },
    /// An ice candidate relayed from the other seat
    PeerIceCandidate { candidate: IceCandidate, peer: PeerId },
}

impl From<ServerRtc> for ServerMessage {
    fn from(value: ServerRtc) -> Self {
        Self::Rtc(value)
    }
}
