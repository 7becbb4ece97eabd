use std::{net::SocketAddr, sync::Arc};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use dashmap::DashMap;
use loole::Sender;
use shared::types::{
    rtc::{PeerId, RoomPeer},
    websocket::{IceCandidate, Sdp},
};

use crate::AppState;

/// Messages other tasks push onto a connected socket's control channel.
/// The socket task turns them into `ServerMessage`s on the wire
#[derive(Debug)]
pub enum ClientControlMessage {
    RtcOffer { sdp: Sdp, peer: PeerId },
    RtcAnswer { sdp: Sdp, peer: PeerId },
    RtcIceCandidate { candidate: IceCandidate, peer: PeerId },
    PeerJoined(RoomPeer),
    PeerLeft(PeerId),
}

#[derive(Debug, Clone)]
pub struct Client {
    pub socket_addr: SocketAddr,
    sender: Sender<ClientControlMessage>,
}

impl Client {
    pub fn new(socket_addr: SocketAddr, sender: Sender<ClientControlMessage>) -> Self {
        Self { socket_addr, sender }
    }

    pub async fn send(
        &self,
        msg: ClientControlMessage,
    ) -> Result<(), loole::SendError<ClientControlMessage>> {
        self.sender.send_async(msg).await
    }
}

type ClientMap = DashMap<PeerId, Client>;

#[derive(Debug, Clone, Default)]
pub struct Clients(Arc<ClientMap>);

impl Clients {
    pub fn add(&self, key: PeerId, client: Client) -> Option<Client> {
        self.0.insert(key, client)
    }

    pub fn get(&self, key: &PeerId) -> Option<Client> {
        self.0.get(key).map(|v| v.value().clone())
    }

    pub fn remove(&self, key: &PeerId) -> Option<Client> {
        self.0.remove(key).map(|v| v.1)
    }
}

impl From<Arc<ClientMap>> for Clients {
    fn from(args: Arc<ClientMap>) -> Self {
        Clients(args)
    }
}

impl FromRef<AppState> for Clients {
    fn from_ref(state: &AppState) -> Self {
        state.clients.clone()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Clients
where
    S: Send + Sync,
    Clients: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Clients::from_ref(state))
    }
}
