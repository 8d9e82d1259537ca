//! Per-room peer-connection negotiation engine.
//!
//! The engine receives membership and signaling events from an external
//! transport, drives one media connection per remote peer through the
//! offer/answer/candidate protocol, and reports remote streams and peer
//! lifecycle to an observer. All events of one room are serialized onto a
//! single queue consumed by one task, so no two transitions for the same
//! peer ever interleave.

pub mod config;
pub mod error;
pub mod media;
pub mod observer;
pub mod room;
pub mod signaling;

pub use config::RoomConfig;
pub use error::RoomError;
pub use media::{
    ConnectionState, LocalMediaProvider, LocalStream, LocalTrack, MediaConnection,
    MediaConnectionFactory, RemoteStream, SdpKind, StaticMediaProvider,
};
pub use observer::RoomObserver;
pub use room::{
    ConnectionRegistry, NegotiationState, PeerNegotiation, Room, RoomEvent, RoomHandle,
    RoomManager,
};
pub use signaling::SignalingTransport;
