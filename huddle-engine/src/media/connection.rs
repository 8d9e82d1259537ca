use async_trait::async_trait;
use huddle_core::model::{IceCandidate, ParticipantId, TrackKind};
use tokio::sync::mpsc;

use crate::media::local::LocalStream;
use crate::room::RoomEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Connectivity of one peer's media connection, surfaced as explicit
/// events so the negotiation can observe its terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Handle forwarded to the presentation layer when remote media arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStream {
    pub id: String,
    pub kinds: Vec<TrackKind>,
}

/// One peer's media connection, owned by the registry for the lifetime of
/// the negotiation. `create_offer`/`create_answer` install the built
/// description as the local description before returning it.
#[async_trait]
pub trait MediaConnection: Send + Sync {
    async fn create_offer(&self) -> anyhow::Result<String>;
    async fn create_answer(&self) -> anyhow::Result<String>;
    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> anyhow::Result<()>;
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> anyhow::Result<()>;
    async fn close(&self) -> anyhow::Result<()>;
}

/// Builds one wired media connection per remote peer: local tracks
/// attached, ICE-candidate / remote-track / connection-state callbacks
/// feeding `events`. Callbacks may fire after the peer is removed; the
/// room guards on registry membership before applying them.
#[async_trait]
pub trait MediaConnectionFactory: Send + Sync {
    async fn create(
        &self,
        peer_id: &ParticipantId,
        local: &LocalStream,
        events: mpsc::Sender<RoomEvent>,
    ) -> anyhow::Result<Box<dyn MediaConnection>>;
}
