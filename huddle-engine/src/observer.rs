use async_trait::async_trait;
use huddle_core::model::ParticipantId;

use crate::media::RemoteStream;

/// The presentation layer's view of a room: remote media becoming ready,
/// peers going away, and per-peer setup failures.
#[async_trait]
pub trait RoomObserver: Send + Sync {
    async fn on_remote_stream_ready(&self, peer_id: ParticipantId, stream: RemoteStream);

    async fn on_peer_disconnected(&self, peer_id: ParticipantId);

    async fn on_setup_error(&self, peer_id: ParticipantId, reason: String);
}
