use huddle_core::model::{IceCandidate, ParticipantId};

use crate::media::{ConnectionState, RemoteStream};

/// Everything that can drive a room: signaling-transport events and media
/// connection callbacks, serialized onto one queue per room so transitions
/// for the same peer never interleave.
#[derive(Debug)]
pub enum RoomEvent {
    /// A remote participant joined the room.
    MemberJoined { peer_id: ParticipantId },

    /// A remote participant left (or their transport session died).
    MemberLeft { peer_id: ParticipantId },

    /// A signaling payload addressed to us arrived from a peer.
    MessageFromPeer {
        peer_id: ParticipantId,
        payload: String,
    },

    /// A peer's media connection discovered a local ICE candidate.
    CandidateDiscovered {
        peer_id: ParticipantId,
        candidate: IceCandidate,
    },

    /// Remote media arrived on a peer's connection.
    TrackReceived {
        peer_id: ParticipantId,
        stream: RemoteStream,
    },

    /// A peer's media connection changed connectivity.
    ConnectionStateChanged {
        peer_id: ParticipantId,
        state: ConnectionState,
    },

    /// The local side leaves the room; every negotiation is torn down and
    /// the event loop exits.
    Leave,
}
