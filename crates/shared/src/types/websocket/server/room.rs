use serde::{Deserialize, Serialize};

use super::ServerMessage;
use crate::types::rtc::{PeerId, RoomId, RoomPeer};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServerRoom {
    /// Confirms the socket is attached, listing whoever else is seated
    Joined { room_id: RoomId, peers: Vec<RoomPeer> },
    /// The other seat attached a socket
    PeerJoined(RoomPeer),
    /// The other seat detached
    PeerLeft(PeerId),
}

impl From<ServerRoom> for ServerMessage {
    fn from(value: ServerRoom) -> Self {
        Self::Room(value)
    }
}

impl TryFrom<ServerRoom> for axum::extract::ws::Message {
    type Error = <ServerMessage as TryInto<axum::extract::ws::Message>>::Error;

    fn try_from(message: ServerRoom) -> Result<Self, Self::Error> {
        let message: ServerMessage = message.into();
        message.try_into()
    }
}
