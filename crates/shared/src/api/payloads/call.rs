use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::rtc::{PeerId, RoomId, RoomPeer};

/// Snapshot of a room's occupancy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub room_id: RoomId,
    pub created_date: DateTime<Utc>,
    pub peers: Vec<RoomPeer>,
}

/// Returned from the join endpoint. `peer_id` is the caller's routing id
/// for the websocket relay, `peers` lists the other seat when taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub room_id: RoomId,
    pub peer_id: PeerId,
    pub peers: Vec<RoomPeer>,
}
