use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use huddle_core::codec;
use huddle_core::model::{IceCandidate, ParticipantId, SignalMessage};
use huddle_engine::SignalingTransport;

/// Mock signaling transport that captures every outgoing payload.
///
/// Payloads are decoded on capture, so every send also proves the engine
/// emits valid wire text.
#[derive(Clone, Default)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<(ParticipantId, SignalMessage)>>>,
    failing: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail, as if the peer's session is gone.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent_to(&self, peer_id: &ParticipantId) -> Vec<SignalMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(id, _)| id == peer_id)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    pub async fn offers_to(&self, peer_id: &ParticipantId) -> Vec<String> {
        self.sent_to(peer_id)
            .await
            .into_iter()
            .filter_map(|msg| match msg {
                SignalMessage::Offer { sdp } => Some(sdp),
                _ => None,
            })
            .collect()
    }

    pub async fn answers_to(&self, peer_id: &ParticipantId) -> Vec<String> {
        self.sent_to(peer_id)
            .await
            .into_iter()
            .filter_map(|msg| match msg {
                SignalMessage::Answer { sdp } => Some(sdp),
                _ => None,
            })
            .collect()
    }

    pub async fn candidates_to(&self, peer_id: &ParticipantId) -> Vec<IceCandidate> {
        self.sent_to(peer_id)
            .await
            .into_iter()
            .filter_map(|msg| match msg {
                SignalMessage::Candidate(candidate) => Some(candidate),
                _ => None,
            })
            .collect()
    }

    pub async fn total_sent(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl SignalingTransport for MockTransport {
    async fn send_to_peer(&self, peer_id: &ParticipantId, payload: String) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("peer {} has no live session", peer_id);
        }
        let msg = codec::decode(&payload)?;
        tracing::debug!("[MockTransport] {:?} -> {}", msg, peer_id);
        self.sent.lock().await.push((peer_id.clone(), msg));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_decoded_messages_per_peer() {
        let transport = MockTransport::new();
        let peer = ParticipantId::from("42");
        let other = ParticipantId::from("7");

        let payload = codec::encode(&SignalMessage::Offer {
            sdp: "v=0".to_string(),
        });
        transport.send_to_peer(&peer, payload).await.unwrap();

        assert_eq!(transport.offers_to(&peer).await, vec!["v=0".to_string()]);
        assert!(transport.sent_to(&other).await.is_empty());
    }

    #[tokio::test]
    async fn failing_transport_rejects_sends() {
        let transport = MockTransport::new();
        transport.set_failing(true);

        let peer = ParticipantId::from("42");
        let payload = codec::encode(&SignalMessage::Answer {
            sdp: "v=0".to_string(),
        });
        assert!(transport.send_to_peer(&peer, payload).await.is_err());
        assert_eq!(transport.total_sent().await, 0);
    }
}
