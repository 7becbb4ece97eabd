use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shared::{
    api::{
        payloads::{JoinRoomResponse, RoomView},
        response_errors::RoomError,
    },
    rtc::{SignalEvent, SignallingState, TransitionError},
    types::{
        rtc::{PeerId, RoomId, RoomPeer},
        Uuid,
    },
};
use thiserror::Error;

use crate::AppState;

const ROOM_SEATS: usize = 2;

/// Why a signalling event was dropped instead of forwarded. Drops are
/// debug-logged by the socket task and never surfaced to the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RelayDrop {
    #[error("room is not registered")]
    UnknownRoom,
    #[error("sender holds no seat in the room")]
    UnknownSeat,
    #[error("the other seat is empty")]
    NoCounterpart,
    #[error("the other seat has no socket attached")]
    CounterpartOffline,
    #[error("{0}")]
    Invalid(#[from] TransitionError),
    #[error("candidates refused between {sender:?} and {receiver:?}")]
    CandidateRefused {
        sender: SignallingState,
        receiver: SignallingState,
    },
}

#[derive(Debug, Clone)]
struct RoomSeat {
    peer_id: PeerId,
    user_id: Uuid,
    connected: bool,
    signalling: SignallingState,
}

impl RoomSeat {
    fn new(user_id: Uuid) -> Self {
        Self {
            peer_id: PeerId::new(),
            user_id,
            connected: false,
            signalling: SignallingState::default(),
        }
    }

    fn peer(&self) -> RoomPeer {
        RoomPeer {
            peer_id: self.peer_id,
            user_id: self.user_id,
            connected: self.connected,
        }
    }
}

#[derive(Debug)]
struct Room {
    created_date: DateTime<Utc>,
    seats: [Option<RoomSeat>; ROOM_SEATS],
}

impl Room {
    fn new() -> Self {
        Self {
            created_date: Utc::now(),
            seats: [None, None],
        }
    }

    fn is_empty(&self) -> bool {
        self.seats.iter().all(Option::is_none)
    }

    fn peers(&self) -> Vec<RoomPeer> {
        self.seats
            .iter()
            .flatten()
            .map(RoomSeat::peer)
            .collect()
    }

    fn peers_except(&self, peer_id: &PeerId) -> Vec<RoomPeer> {
        self.seats
            .iter()
            .flatten()
            .filter(|s| &s.peer_id != peer_id)
            .map(RoomSeat::peer)
            .collect()
    }

    fn seat_for_user_mut(&mut self, user_id: &Uuid) -> Option<&mut RoomSeat> {
        self.seats
            .iter_mut()
            .flatten()
            .find(|s| &s.user_id == user_id)
    }

    fn seat_for_peer_mut(&mut self, peer_id: &PeerId) -> Option<&mut RoomSeat> {
        self.seats
            .iter_mut()
            .flatten()
            .find(|s| &s.peer_id == peer_id)
    }

    fn vacancy_mut(&mut self) -> Option<&mut Option<RoomSeat>> {
        self.seats.iter_mut().find(|s| s.is_none())
    }

    /// Both seats split as (sender, receiver), or None unless both are
    /// occupied with the sender among them
    fn pair_mut(&mut self, from: &PeerId) -> Option<(&mut RoomSeat, &mut RoomSeat)> {
        let [a, b] = &mut self.seats;
        match (a.as_mut(), b.as_mut()) {
            (Some(x), Some(y)) if &x.peer_id == from => Some((x, y)),
            (Some(x), Some(y)) if &y.peer_id == from => Some((y, x)),
            _ => None,
        }
    }
}

/// The caller's freed seat plus whoever is still in the room
#[derive(Debug)]
pub struct LeftSeat {
    pub peer_id: PeerId,
    pub remaining: Option<RoomPeer>,
}

/// Outcome of binding a websocket to a seat
#[derive(Debug)]
pub struct Attached {
    pub me: RoomPeer,
    pub peers: Vec<RoomPeer>,
}

/// Outcome of a socket detaching from its seat
#[derive(Debug)]
pub struct Detached {
    pub remaining: Option<RoomPeer>,
}

/// In-memory registry of two-party call rooms. Rooms exist from first
/// join until the last seat is freed; websocket attachment is tracked
/// separately from membership
// TODO: a room whose members never call leave lives forever, needs an
// idle sweep keyed off created_date
#[derive(Debug, Clone, Default)]
pub struct CallRooms(Arc<DashMap<RoomId, Room>>);

impl CallRooms {
    pub fn view(&self, room_id: &RoomId) -> Option<RoomView> {
        self.0.get(room_id).map(|room| RoomView {
            room_id: *room_id,
            created_date: room.created_date,
            peers: room.peers(),
        })
    }

    /// First join creates the room. A seated user joining again keeps
    /// their seat and peer_id with the negotiation wound back to idle
    pub fn join(&self, room_id: RoomId, user_id: Uuid) -> Result<JoinRoomResponse, RoomError> {
        let mut room = self.0.entry(room_id).or_insert_with(Room::new);

        if let Some(seat) = room.seat_for_user_mut(&user_id) {
            seat.signalling = SignallingState::Idle;
            let peer_id = seat.peer_id;
            let peers = room.peers_except(&peer_id);
            return Ok(JoinRoomResponse { room_id, peer_id, peers });
        }

        let Some(slot) = room.vacancy_mut() else {
            return Err(RoomError::RoomFull);
        };

        let seat = RoomSeat::new(user_id);
        let peer_id = seat.peer_id;
        *slot = Some(seat);

        let peers = room.peers_except(&peer_id);
        Ok(JoinRoomResponse { room_id, peer_id, peers })
    }

    /// Frees the caller's seat. No-op None when the user holds no seat
    /// (or the room is unknown); an emptied room is removed
    pub fn leave(&self, room_id: &RoomId, user_id: &Uuid) -> Option<LeftSeat> {
        let left = {
            let mut room = self.0.get_mut(room_id)?;

            let taken = room
                .seats
                .iter_mut()
                .find(|s| s.as_ref().is_some_and(|seat| &seat.user_id == user_id))
                .and_then(Option::take)?;

            // the counterpart's half-open negotiation died with this seat
            for seat in room.seats.iter_mut().flatten() {
                seat.signalling = SignallingState::Idle;
            }

            LeftSeat {
                peer_id: taken.peer_id,
                remaining: room.peers().pop(),
            }
        };

        self.0.remove_if(room_id, |_, room| room.is_empty());

        Some(left)
    }

    /// Binds a websocket to the seat holding `peer_id`. None (and no
    /// state change) when the room or seat is unknown
    pub fn attach(&self, room_id: &RoomId, peer_id: &PeerId) -> Option<Attached> {
        let mut room = self.0.get_mut(room_id)?;
        let seat = room.seat_for_peer_mut(peer_id)?;
        seat.connected = true;
        let me = seat.peer();
        let peers = room.peers_except(peer_id);
        Some(Attached { me, peers })
    }

    /// Marks the seat's socket gone without freeing the seat. Whatever
    /// was negotiated is void, so both seats wind back to idle
    pub fn detach(&self, room_id: &RoomId, peer_id: &PeerId) -> Option<Detached> {
        let mut room = self.0.get_mut(room_id)?;
        let seat = room.seat_for_peer_mut(peer_id)?;
        seat.connected = false;

        for seat in room.seats.iter_mut().flatten() {
            seat.signalling = SignallingState::Idle;
        }

        let remaining = room.peers_except(peer_id).pop();
        Some(Detached { remaining })
    }

    pub fn relay_offer(&self, room_id: &RoomId, from: &PeerId) -> Result<RoomPeer, RelayDrop> {
        self.relay(room_id, from, SignalEvent::LocalOffer, SignalEvent::RemoteOffer)
    }

    pub fn relay_answer(&self, room_id: &RoomId, from: &PeerId) -> Result<RoomPeer, RelayDrop> {
        self.relay(room_id, from, SignalEvent::LocalAnswer, SignalEvent::RemoteAnswer)
    }

    /// Candidates carry no transition, they are forwarded whenever both
    /// seats are mid-negotiation
    pub fn relay_candidate(&self, room_id: &RoomId, from: &PeerId) -> Result<RoomPeer, RelayDrop> {
        let mut room = self.0.get_mut(room_id).ok_or(RelayDrop::UnknownRoom)?;
        let (sender, receiver) = Self::pair(&mut room, from)?;

        if !(sender.signalling.accepts_candidates() && receiver.signalling.accepts_candidates()) {
            return Err(RelayDrop::CandidateRefused {
                sender: sender.signalling,
                receiver: receiver.signalling,
            });
        }

        Ok(receiver.peer())
    }

    /// Applies the sender's local transition and the receiver's remote
    /// transition under the room lock. Neither seat mutates unless both
    /// transitions are legal
    fn relay(
        &self,
        room_id: &RoomId,
        from: &PeerId,
        local: SignalEvent,
        remote: SignalEvent,
    ) -> Result<RoomPeer, RelayDrop> {
        let mut room = self.0.get_mut(room_id).ok_or(RelayDrop::UnknownRoom)?;
        let (sender, receiver) = Self::pair(&mut room, from)?;

        let next_local = sender.signalling.apply(local)?;
        let next_remote = receiver.signalling.apply(remote)?;
        sender.signalling = next_local;
        receiver.signalling = next_remote;

        Ok(receiver.peer())
    }

    fn pair<'a>(
        room: &'a mut Room,
        from: &PeerId,
    ) -> Result<(&'a mut RoomSeat, &'a mut RoomSeat), RelayDrop> {
        if room.seat_for_peer_mut(from).is_none() {
            return Err(RelayDrop::UnknownSeat);
        }
        let (sender, receiver) = room.pair_mut(from).ok_or(RelayDrop::NoCounterpart)?;
        if !receiver.connected {
            return Err(RelayDrop::CounterpartOffline);
        }
        Ok((sender, receiver))
    }
}

impl FromRef<AppState> for CallRooms {
    fn from_ref(state: &AppState) -> Self {
        state.rooms.clone()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallRooms
where
    S: Send + Sync,
    CallRooms: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(CallRooms::from_ref(state))
    }
}
