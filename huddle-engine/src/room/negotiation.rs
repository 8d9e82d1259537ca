use huddle_core::model::{IceCandidate, ParticipantId};

use crate::media::MediaConnection;

/// Negotiation progress for one remote peer. `OfferCreated` and
/// `AnswerCreated` are the short-lived stops between building a
/// description and handing it to the transport; since all of a room's
/// events run on one queue, other events never observe them mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    OfferCreated,
    OfferSent,
    AnswerCreated,
    AnswerSent,
    Connected,
    Closed,
}

impl NegotiationState {
    /// True while our own offer is outstanding, i.e. the glare window in
    /// which an incoming offer collides with ours.
    pub fn offer_outstanding(self) -> bool {
        matches!(self, Self::OfferCreated | Self::OfferSent)
    }
}

/// One remote peer's negotiation: its state, the owning handle to the
/// media connection, and candidates that arrived before the remote
/// description did.
pub struct PeerNegotiation {
    pub peer_id: ParticipantId,
    pub state: NegotiationState,
    pub(crate) connection: Box<dyn MediaConnection>,
    pending_candidates: Vec<IceCandidate>,
    remote_description_set: bool,
}

impl PeerNegotiation {
    pub(crate) fn new(peer_id: ParticipantId, connection: Box<dyn MediaConnection>) -> Self {
        Self {
            peer_id,
            state: NegotiationState::Idle,
            connection,
            pending_candidates: Vec::new(),
            remote_description_set: false,
        }
    }

    pub fn remote_description_set(&self) -> bool {
        self.remote_description_set
    }

    pub(crate) fn mark_remote_description(&mut self) {
        self.remote_description_set = true;
    }

    /// Queue a candidate that arrived before the remote description.
    /// Receipt order is preserved; nothing is dropped.
    pub(crate) fn push_pending(&mut self, candidate: IceCandidate) {
        self.pending_candidates.push(candidate);
    }

    pub(crate) fn take_pending(&mut self) -> Vec<IceCandidate> {
        std::mem::take(&mut self.pending_candidates)
    }

    pub fn pending_candidates(&self) -> &[IceCandidate] {
        &self.pending_candidates
    }
}
