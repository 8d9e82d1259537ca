use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use huddle_core::model::ParticipantId;

use crate::error::RoomError;
use crate::media::{LocalStream, MediaConnectionFactory};
use crate::room::negotiation::{NegotiationState, PeerNegotiation};
use crate::room::room_event::RoomEvent;

/// Owns every [`PeerNegotiation`] of one room, at most one per peer.
/// The state machine borrows entries only for the duration of handling a
/// single event.
pub struct ConnectionRegistry {
    entries: HashMap<ParticipantId, PeerNegotiation>,
    factory: Arc<dyn MediaConnectionFactory>,
    events: mpsc::Sender<RoomEvent>,
}

impl ConnectionRegistry {
    pub fn new(factory: Arc<dyn MediaConnectionFactory>, events: mpsc::Sender<RoomEvent>) -> Self {
        Self {
            entries: HashMap::new(),
            factory,
            events,
        }
    }

    pub fn contains(&self, peer_id: &ParticipantId) -> bool {
        self.entries.contains_key(peer_id)
    }

    pub fn get(&self, peer_id: &ParticipantId) -> Option<&PeerNegotiation> {
        self.entries.get(peer_id)
    }

    pub fn get_mut(&mut self, peer_id: &ParticipantId) -> Option<&mut PeerNegotiation> {
        self.entries.get_mut(peer_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Existing entry, or a fresh `Idle` one with a newly wired media
    /// connection. A factory failure leaves the registry unchanged and
    /// surfaces as `ConnectionSetupFailed`.
    pub async fn get_or_create(
        &mut self,
        peer_id: &ParticipantId,
        local: &LocalStream,
    ) -> Result<&mut PeerNegotiation, RoomError> {
        if !self.entries.contains_key(peer_id) {
            let connection = self
                .factory
                .create(peer_id, local, self.events.clone())
                .await
                .map_err(|source| RoomError::ConnectionSetupFailed {
                    peer_id: peer_id.clone(),
                    source,
                })?;
            debug!("created negotiation entry for {}", peer_id);
            self.entries.insert(
                peer_id.clone(),
                PeerNegotiation::new(peer_id.clone(), connection),
            );
        }

        Ok(self
            .entries
            .get_mut(peer_id)
            .expect("entry present or just inserted"))
    }

    /// Tear down and discard the peer's entry, closing its media
    /// connection. Returns whether an entry existed.
    pub async fn remove(&mut self, peer_id: &ParticipantId) -> bool {
        let Some(mut entry) = self.entries.remove(peer_id) else {
            return false;
        };
        entry.state = NegotiationState::Closed;
        if let Err(e) = entry.connection.close().await {
            debug!("closing connection for {} failed: {:#}", peer_id, e);
        }
        true
    }

    /// Room teardown: close every connection, returning the ids that were
    /// present so the caller can notify per peer.
    pub async fn drain(&mut self) -> Vec<ParticipantId> {
        let ids: Vec<_> = self.entries.keys().cloned().collect();
        for id in &ids {
            self.remove(id).await;
        }
        ids
    }
}
