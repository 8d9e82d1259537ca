//! Shared data model and signaling codec for the huddle negotiation engine.

pub mod codec;
pub mod model;

pub use codec::{CodecError, decode, encode};
pub use model::{
    IceCandidate, IceServerConfig, MediaConstraints, ParticipantId, RoomId, SignalMessage,
    TrackKind, VideoConstraints,
};
