use serde::{Deserialize, Serialize};

/// Where one seat of a call sits in the offer/answer exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignallingState {
    #[default]
    Idle,
    HaveLocalOffer,
    HaveRemoteOffer,
    Stable,
    Closed,
}

/// A signalling event as seen from one seat. Local events originate from
/// the seat itself, remote ones arrive relayed from the other seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    LocalOffer,
    RemoteOffer,
    LocalAnswer,
    RemoteAnswer,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{event:?} is not legal from {from:?}")]
pub struct TransitionError {
    pub from: SignallingState,
    pub event: SignalEvent,
}

impl SignallingState {
    /// Applies `event`, returning the next state. The current state is
    /// returned untouched inside the error when the event is not legal
    pub fn apply(self, event: SignalEvent) -> Result<Self, TransitionError> {
        use SignalEvent::*;
        use SignallingState::*;

        let next = match (self, event) {
            (Idle | Stable, LocalOffer) => HaveLocalOffer,
            (Idle | Stable, RemoteOffer) => HaveRemoteOffer,
            (HaveRemoteOffer, LocalAnswer) => Stable,
            (HaveLocalOffer, RemoteAnswer) => Stable,
            (_, Close) => Closed,
            (from, event) => return Err(TransitionError { from, event }),
        };

        Ok(next)
    }

    /// Candidates only make sense while an offer or a session is in
    /// flight, never before the first offer or after close
    pub fn accepts_candidates(self) -> bool {
        use SignallingState::*;
        !matches!(self, Idle | Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::{SignalEvent::*, SignallingState::*, TransitionError};

    #[test]
    fn offer_answer_reaches_stable() {
        let caller = Idle.apply(LocalOffer).unwrap();
        assert_eq!(caller, HaveLocalOffer);

        let callee = Idle.apply(RemoteOffer).unwrap();
        assert_eq!(callee, HaveRemoteOffer);

        assert_eq!(callee.apply(LocalAnswer).unwrap(), Stable);
        assert_eq!(caller.apply(RemoteAnswer).unwrap(), Stable);
    }

    #[test]
    fn stable_allows_renegotiation() {
        assert_eq!(Stable.apply(LocalOffer).unwrap(), HaveLocalOffer);
        assert_eq!(Stable.apply(RemoteOffer).unwrap(), HaveRemoteOffer);
    }

    #[test]
    fn answers_need_a_matching_offer() {
        assert_eq!(
            Idle.apply(LocalAnswer),
            Err(TransitionError {
                from: Idle,
                event: LocalAnswer,
            })
        );
        assert_eq!(
            Idle.apply(RemoteAnswer),
            Err(TransitionError {
                from: Idle,
                event: RemoteAnswer,
            })
        );
        // An answer must come from the opposite side of the offer
        assert!(HaveLocalOffer.apply(LocalAnswer).is_err());
        assert!(HaveRemoteOffer.apply(RemoteAnswer).is_err());
    }

    #[test]
    fn glare_is_rejected() {
        // Both sides offering at once leaves each waiting for an answer,
        // not accepting a second offer
        assert!(HaveLocalOffer.apply(RemoteOffer).is_err());
        assert!(HaveLocalOffer.apply(LocalOffer).is_err());
        assert!(HaveRemoteOffer.apply(LocalOffer).is_err());
        assert!(HaveRemoteOffer.apply(RemoteOffer).is_err());
    }

    #[test]
    fn close_is_legal_everywhere_and_final() {
        for state in [Idle, HaveLocalOffer, HaveRemoteOffer, Stable, Closed] {
            assert_eq!(state.apply(Close).unwrap(), Closed);
        }

        for event in [LocalOffer, RemoteOffer, LocalAnswer, RemoteAnswer] {
            assert!(Closed.apply(event).is_err());
        }
    }

    #[test]
    fn candidates_gated_on_an_offer_existing() {
        assert!(!Idle.accepts_candidates());
        assert!(!Closed.accepts_candidates());
        assert!(HaveLocalOffer.accepts_candidates());
        assert!(HaveRemoteOffer.accepts_candidates());
        assert!(Stable.accepts_candidates());
    }
}
