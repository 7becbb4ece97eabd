use axum::extract::ws::Message as AxumMessage;
use serde::{Deserialize, Serialize};

use super::ClientRtc;
use crate::types::{
    rtc::{PeerId, RoomId},
    websocket::MessageError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Attach this socket to a seat previously claimed via the join endpoint
    Join { room_id: RoomId, peer_id: PeerId },
    /// Detach from the current room, keeping the seat
    Leave,
    /// Rtc related messages
    Rtc(ClientRtc),
}

impl TryFrom<AxumMessage> for ClientMessage {
    type Error = MessageError;

    fn try_from(message: AxumMessage) -> Result<Self, Self::Error> {
        use AxumMessage::*;
        match message {
            Text(text) => Ok(serde_json::from_str(&text)?),
            Binary(bytes) => Ok(serde_json::from_slice(&bytes)?),
            other => Err(MessageError::Other(format!(
                "Unexpected message type {other:?} for ClientMessage"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message as AxumMessage;

    use super::{ClientMessage, ClientRtc};
    use crate::types::websocket::{Sdp, SdpType};

    #[test]
    fn parses_text_and_binary_frames() {
        let rtc: ClientMessage = ClientRtc::Offer {
            sdp: Sdp {
                type_: SdpType::Offer,
                sdp: "v=0".to_string(),
            },
        }
        .into();
        let json = serde_json::to_string(&rtc).unwrap();

        // Browser clients send sdp payloads with the RTCSdpType casing
        assert!(json.contains(r#""type":"offer""#), "{json}");

        assert!(ClientMessage::try_from(AxumMessage::Text(json.clone())).is_ok());
        assert!(ClientMessage::try_from(AxumMessage::Binary(json.into_bytes())).is_ok());
    }

    #[test]
    fn control_frames_are_not_client_messages() {
        assert!(ClientMessage::try_from(AxumMessage::Ping(vec![])).is_err());
    }
}
