use axum::{extract::Path, Json};
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{JoinRoomResponse, RoomView},
        response_errors::RoomError,
    },
    types::rtc::RoomId,
};
use tracing::debug;

use crate::{CallRooms, ClientControlMessage, Clients, UserState};

pub async fn fetch_room(
    _user_state: UserState,
    rooms: CallRooms,
    Path(room_id): Path<RoomId>,
) -> Result<Json<RoomView>, ServerError<RoomError>> {
    let view = rooms.view(&room_id).ok_or(RoomError::NotFound)?;

    Ok(Json(view))
}

pub async fn join_room(
    user_state: UserState,
    rooms: CallRooms,
    Path(room_id): Path<RoomId>,
) -> Result<Json<JoinRoomResponse>, ServerError<RoomError>> {
    let response = rooms.join(room_id, user_state.id)?;

    Ok(Json(response))
}

pub async fn leave_room(
    user_state: UserState,
    rooms: CallRooms,
    clients: Clients,
    Path(room_id): Path<RoomId>,
) -> Result<Json<()>, ServerError<Nothing>> {
    // idempotent, leaving a room you are not in is a no-op
    if let Some(left) = rooms.leave(&room_id, &user_state.id) {
        clients.remove(&left.peer_id);

        if let Some(remaining) = left.remaining.filter(|p| p.connected) {
            if let Some(client) = clients.get(&remaining.peer_id) {
                if let Err(e) = client.send(ClientControlMessage::PeerLeft(left.peer_id)).await {
                    debug!("Failed to notify {} of the leave: {e:?}", remaining.peer_id);
                }
            }
        }
    }

    Ok(Json(()))
}
