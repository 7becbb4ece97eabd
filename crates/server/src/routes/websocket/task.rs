use std::{net::SocketAddr, time::Duration};

use axum::extract::ws::{Message as WSMessage, WebSocket};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use loole::{Receiver, RecvError, Sender};
use shared::types::{
    rtc::{PeerId, RoomId, RoomPeer},
    websocket::{ClientMessage, ClientRtc, ServerMessage, ServerRoom, ServerRtc},
};
use tokio::time;
use tracing::{debug, error, warn};

use crate::{CallRooms, Client, ClientControlMessage, Clients};

pub async fn handle_socket(
    socket: WebSocket,
    socket_addr: SocketAddr,
    sender: Sender<ClientControlMessage>,
    receiver: Receiver<ClientControlMessage>,
    rooms: CallRooms,
    clients: Clients,
) {
    if let Err(e) = handle_socket_inner(socket, socket_addr, sender, receiver, rooms, clients).await
    {
        error!("handle_socket error: {e:?}");
    }
}

async fn handle_socket_inner(
    socket: WebSocket,
    socket_addr: SocketAddr,
    sender: Sender<ClientControlMessage>,
    receiver: Receiver<ClientControlMessage>,
    rooms: CallRooms,
    clients: Clients,
) -> Result<(), anyhow::Error> {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // The seat this socket is bound to, set by a Join message
    let mut joined: Option<(RoomId, PeerId)> = None;

    let mut interval = time::interval(Duration::from_secs(30));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                ws_sender.send(WSMessage::Ping(vec![])).await?;
            },
            // Receive control messages from the rest of the server
            r = receiver.recv_async() => match r {
                Ok(m) => {
                    let message: ServerMessage = match m {
                        ClientControlMessage::RtcOffer { sdp, peer } =>
                            ServerRtc::PeerOffer { sdp, peer }.into(),
                        ClientControlMessage::RtcAnswer { sdp, peer } =>
                            ServerRtc::PeerAnswer { sdp, peer }.into(),
                        ClientControlMessage::RtcIceCandidate { candidate, peer } =>
                            ServerRtc::PeerIceCandidate { candidate, peer }.into(),
                        ClientControlMessage::PeerJoined(peer) =>
                            ServerRoom::PeerJoined(peer).into(),
                        ClientControlMessage::PeerLeft(peer_id) =>
                            ServerRoom::PeerLeft(peer_id).into(),
                    };
                    ws_sender.send(message.try_into()?).await?;
                },
                Err(RecvError::Disconnected) => break,
            },

            // Receive messages from the websocket
            r = ws_receiver.next() => match r {
                Some(Ok(m)) => {
                    match m {
                        WSMessage::Ping(_) => debug!("WsClient {socket_addr:?} ping"),
                        WSMessage::Pong(_) => debug!("WsClient {socket_addr:?} pong"),
                        WSMessage::Close(c) => {
                            if let Some(cf) = c {
                                debug!("WsClient {socket_addr:?}: sent close with code {} and reason {}", cf.code, cf.reason);
                            } else {
                                warn!("WsClient {socket_addr:?}: sent close without CloseFrame");
                            }
                            break;
                        },
                        text_or_binary => {
                            let message = ClientMessage::try_from(text_or_binary)?;
                            debug!("WsClient {socket_addr:?}: got client message: {message:?}");
                            handle_client_message(
                                &mut ws_sender,
                                socket_addr,
                                message,
                                &mut joined,
                                &sender,
                                &rooms,
                                &clients,
                            )
                            .await?;
                        },
                    }
                },
                Some(Err(e)) => {
                    error!("WsClient {:?}: recv error: {:?}", socket_addr, e);
                    break;
                },
                None => {
                    warn!("WsClient {:?}: got None before Close", socket_addr);
                    break;
                },
            },
        }
    }

    // The seat stays reserved, only the socket binding is dropped
    if let Some((room_id, peer_id)) = joined.take() {
        detach_seat(&room_id, &peer_id, &rooms, &clients).await;
    }

    // returning from the handler closes the websocket connection
    debug!("context destroyed ({socket_addr})");

    Ok(())
}

async fn handle_client_message(
    ws_sender: &mut SplitSink<WebSocket, WSMessage>,
    socket_addr: SocketAddr,
    message: ClientMessage,
    joined: &mut Option<(RoomId, PeerId)>,
    sender: &Sender<ClientControlMessage>,
    rooms: &CallRooms,
    clients: &Clients,
) -> Result<(), anyhow::Error> {
    match message {
        ClientMessage::Join { room_id, peer_id } => {
            // Moving seats implicitly detaches the old one
            if let Some((old_room, old_peer)) = joined.take() {
                if (old_room, old_peer) != (room_id, peer_id) {
                    detach_seat(&old_room, &old_peer, rooms, clients).await;
                }
            }

            let Some(attached) = rooms.attach(&room_id, &peer_id) else {
                debug!("WsClient {socket_addr:?}: join for unknown seat {room_id}/{peer_id}, ignoring");
                return Ok(());
            };

            *joined = Some((room_id, peer_id));

            if let Some(old_client) = clients.add(peer_id, Client::new(socket_addr, sender.clone()))
            {
                warn!("A socket with the same peer_id evicted a previous one: {old_client:?}");
            }

            let joined_message = ServerRoom::Joined {
                room_id,
                peers: attached.peers.clone(),
            };
            ws_sender.send(joined_message.try_into()?).await?;

            for peer in attached.peers.iter().filter(|p| p.connected) {
                forward(clients, peer, ClientControlMessage::PeerJoined(attached.me)).await;
            }
        },
        ClientMessage::Leave => {
            if let Some((room_id, peer_id)) = joined.take() {
                detach_seat(&room_id, &peer_id, rooms, clients).await;
            }
        },
        ClientMessage::Rtc(rtc) => {
            let Some((room_id, peer_id)) = joined.as_ref() else {
                debug!("WsClient {socket_addr:?}: rtc message before join, dropping");
                return Ok(());
            };

            match rtc {
                ClientRtc::Offer { sdp } => match rooms.relay_offer(room_id, peer_id) {
                    Ok(target) => {
                        debug!("Forwarding offer from {peer_id} to {}", target.peer_id);
                        forward(
                            clients,
                            &target,
                            ClientControlMessage::RtcOffer { sdp, peer: *peer_id },
                        )
                        .await;
                    },
                    Err(reason) => debug!("WsClient {socket_addr:?}: offer dropped: {reason}"),
                },
                ClientRtc::Answer { sdp } => match rooms.relay_answer(room_id, peer_id) {
                    Ok(target) => {
                        debug!("Forwarding answer from {peer_id} to {}", target.peer_id);
                        forward(
                            clients,
                            &target,
                            ClientControlMessage::RtcAnswer { sdp, peer: *peer_id },
                        )
                        .await;
                    },
                    Err(reason) => debug!("WsClient {socket_addr:?}: answer dropped: {reason}"),
                },
                ClientRtc::IceCandidate { candidate } => {
                    match rooms.relay_candidate(room_id, peer_id) {
                        Ok(target) => {
                            debug!(
                                "Forwarding ice candidate from {peer_id} to {}",
                                target.peer_id
                            );
                            forward(
                                clients,
                                &target,
                                ClientControlMessage::RtcIceCandidate {
                                    candidate,
                                    peer: *peer_id,
                                },
                            )
                            .await;
                        },
                        Err(reason) => {
                            debug!("WsClient {socket_addr:?}: ice candidate dropped: {reason}")
                        },
                    }
                },
            }
        },
    }

    Ok(())
}

/// Unbind the socket from its seat and tell whoever is still connected
async fn detach_seat(room_id: &RoomId, peer_id: &PeerId, rooms: &CallRooms, clients: &Clients) {
    clients.remove(peer_id);

    if let Some(detached) = rooms.detach(room_id, peer_id) {
        if let Some(remaining) = detached.remaining.filter(|p| p.connected) {
            forward(clients, &remaining, ClientControlMessage::PeerLeft(*peer_id)).await;
        }
    }
}

/// Best-effort delivery onto a peer's control channel. Failures mean the
/// peer is detaching concurrently and are only worth a debug line
async fn forward(clients: &Clients, target: &RoomPeer, message: ClientControlMessage) {
    let Some(client) = clients.get(&target.peer_id) else {
        debug!("No socket attached for {}", target.peer_id);
        return;
    };

    if let Err(e) = client.send(message).await {
        debug!("Forwarding to {} failed: {e:?}", target.peer_id);
    }
}
