use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{connect_info::ConnectInfo, ws::WebSocketUpgrade},
    http::HeaderMap,
    response::IntoResponse,
};
use tracing::debug;

use super::handle_socket;
use crate::{constants::WEBSOCKET_CHANNEL_BOUND, CallRooms, Clients, UserState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    // We want the address as a key for the client map
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    // If X-Forwarded-* is set use it to override the addr
    headers: HeaderMap,
    // User has to be identified to open a relay socket
    _user_state: UserState,
    rooms: CallRooms,
    clients: Clients,
) -> impl IntoResponse {
    debug!("Websocket upgrade headers: {:?}", headers);

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<IpAddr>().ok())
        .unwrap_or(addr.ip());

    let port = headers
        .get("x-forwarded-port")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(addr.port());

    let socket_addr = SocketAddr::new(ip, port);

    // The sender half is registered against the seat on Join so other
    // tasks can reach this socket
    let (sender, receiver) = loole::bounded(WEBSOCKET_CHANNEL_BOUND);

    // Complete the upgrade to a websocket
    ws.on_upgrade(move |socket| handle_socket(socket, socket_addr, sender, receiver, rooms, clients))
}
