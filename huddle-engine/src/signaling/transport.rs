use async_trait::async_trait;
use huddle_core::model::ParticipantId;

/// Outbound half of the signaling transport.
///
/// The transport delivers the payload point-to-point to one room member,
/// in order per sender. Delivery to a peer that has already left is
/// expected to fail; the room logs such failures and never retries.
/// Inbound traffic (membership changes, peer messages) reaches the room
/// through its event queue instead.
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    async fn send_to_peer(&self, peer_id: &ParticipantId, payload: String) -> anyhow::Result<()>;
}
