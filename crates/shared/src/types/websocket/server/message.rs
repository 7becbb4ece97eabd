use serde::{Deserialize, Serialize};

use super::{ServerRoom, ServerRtc};
use crate::types::websocket::MessageError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServerMessage {
    /// Rtc related messages
    Rtc(ServerRtc),
    /// Room membership messages
    Room(ServerRoom),
}

impl TryFrom<ServerMessage> for axum::extract::ws::Message {
    type Error = MessageError;

    fn try_from(message: ServerMessage) -> Result<Self, Self::Error> {
        let payload = serde_json::to_vec(&message)?;
        Ok(axum::extract::ws::Message::Binary(payload))
    }
}
