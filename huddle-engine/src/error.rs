use huddle_core::codec::CodecError;
use huddle_core::model::ParticipantId;
use thiserror::Error;

/// Failures of one peer's negotiation. None of these may stop the room's
/// event loop; the room logs, informs the observer where relevant, and
/// keeps serving the remaining peers.
#[derive(Debug, Error)]
pub enum RoomError {
    /// Constructing or driving the media connection for a peer failed.
    /// The registry holds no entry for the peer afterwards.
    #[error("media connection setup failed for peer {peer_id}: {source}")]
    ConnectionSetupFailed {
        peer_id: ParticipantId,
        #[source]
        source: anyhow::Error,
    },

    /// An answer or candidate referenced a peer with no negotiation entry.
    /// Offers never produce this since an offer creates the entry.
    #[error("no negotiation entry for peer {peer_id}")]
    UnknownPeer { peer_id: ParticipantId },

    #[error(transparent)]
    Codec(#[from] CodecError),
}
