mod media;
mod peer;
mod room;
mod signaling;

pub use media::{MediaConstraints, TrackKind, VideoConstraints};
pub use peer::ParticipantId;
pub use room::RoomId;
pub use signaling::{IceCandidate, IceServerConfig, SignalMessage};
