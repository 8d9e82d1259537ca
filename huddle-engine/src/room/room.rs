use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use huddle_core::codec;
use huddle_core::model::{IceCandidate, MediaConstraints, ParticipantId, RoomId, SignalMessage};

use crate::config::RoomConfig;
use crate::error::RoomError;
use crate::media::{
    ConnectionState, LocalMediaProvider, LocalStream, MediaConnectionFactory, RemoteStream,
    SdpKind,
};
use crate::observer::RoomObserver;
use crate::room::negotiation::NegotiationState;
use crate::room::registry::ConnectionRegistry;
use crate::room::room_event::RoomEvent;
use crate::signaling::SignalingTransport;

/// Cloneable handle used by the transport integration (and the media
/// connection callbacks) to feed a room's event queue.
#[derive(Clone)]
pub struct RoomHandle {
    events: mpsc::Sender<RoomEvent>,
}

impl RoomHandle {
    pub async fn send(
        &self,
        event: RoomEvent,
    ) -> Result<(), mpsc::error::SendError<RoomEvent>> {
        self.events.send(event).await
    }

    pub fn sender(&self) -> mpsc::Sender<RoomEvent> {
        self.events.clone()
    }
}

/// One room's negotiation engine: a registry of per-peer negotiations
/// driven by a single ordered event stream.
pub struct Room {
    room_id: RoomId,
    local_id: ParticipantId,
    registry: ConnectionRegistry,
    transport: Arc<dyn SignalingTransport>,
    observer: Arc<dyn RoomObserver>,
    media: Arc<dyn LocalMediaProvider>,
    local_stream: Option<Arc<LocalStream>>,
    constraints: MediaConstraints,
    event_rx: mpsc::Receiver<RoomEvent>,
}

impl Room {
    pub fn new(
        room_id: RoomId,
        local_id: ParticipantId,
        config: RoomConfig,
        factory: Arc<dyn MediaConnectionFactory>,
        media: Arc<dyn LocalMediaProvider>,
        transport: Arc<dyn SignalingTransport>,
        observer: Arc<dyn RoomObserver>,
    ) -> (Self, RoomHandle) {
        let (event_tx, event_rx) = mpsc::channel(config.event_queue_depth);
        let registry = ConnectionRegistry::new(factory, event_tx.clone());
        let handle = RoomHandle { events: event_tx };

        let room = Self {
            room_id,
            local_id,
            registry,
            transport,
            observer,
            media,
            local_stream: None,
            constraints: config.constraints,
            event_rx,
        };
        (room, handle)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// The shared local capture stream, if it has been acquired yet.
    pub fn local_stream(&self) -> Option<&Arc<LocalStream>> {
        self.local_stream.as_ref()
    }

    pub async fn run(mut self) {
        info!("room {} event loop started", self.room_id);

        while let Some(event) = self.event_rx.recv().await {
            if !self.handle_event(event).await {
                break;
            }
        }

        self.teardown().await;
        info!("room {} event loop finished", self.room_id);
    }

    /// Process one event, returning `false` when the loop should stop.
    /// Public so tests can drive a room deterministically without a task.
    pub async fn handle_event(&mut self, event: RoomEvent) -> bool {
        match event {
            RoomEvent::MemberJoined { peer_id } => self.handle_member_joined(peer_id).await,
            RoomEvent::MemberLeft { peer_id } => self.handle_member_left(peer_id).await,
            RoomEvent::MessageFromPeer { peer_id, payload } => {
                self.handle_message(peer_id, payload).await
            }
            RoomEvent::CandidateDiscovered { peer_id, candidate } => {
                self.handle_local_candidate(peer_id, candidate).await
            }
            RoomEvent::TrackReceived { peer_id, stream } => {
                self.handle_track(peer_id, stream).await
            }
            RoomEvent::ConnectionStateChanged { peer_id, state } => {
                self.handle_connection_state(peer_id, state).await
            }
            RoomEvent::Leave => return false,
        }
        true
    }

    async fn handle_member_joined(&mut self, peer_id: ParticipantId) {
        info!("member {} joined room {}", peer_id, self.room_id);

        if self.registry.contains(&peer_id) {
            // The peer rejoined before we saw it leave; its old connection
            // is stale.
            self.registry.remove(&peer_id).await;
        }

        if let Err(e) = self.send_offer(&peer_id).await {
            self.report_setup_failure(peer_id, e).await;
        }
    }

    async fn handle_member_left(&mut self, peer_id: ParticipantId) {
        if self.registry.remove(&peer_id).await {
            info!("member {} left room {}", peer_id, self.room_id);
            self.observer.on_peer_disconnected(peer_id).await;
        }
    }

    async fn handle_message(&mut self, peer_id: ParticipantId, payload: String) {
        let msg = match codec::decode(&payload).map_err(RoomError::from) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("dropping malformed message from {}: {}", peer_id, e);
                return;
            }
        };

        match msg {
            SignalMessage::Offer { sdp } => self.handle_offer(peer_id, sdp).await,
            SignalMessage::Answer { sdp } => {
                if let Err(e) = self.apply_answer(&peer_id, sdp).await {
                    warn!("dropping answer from {}: {}", peer_id, e);
                }
            }
            SignalMessage::Candidate(candidate) => {
                if let Err(e) = self.apply_candidate(&peer_id, candidate).await {
                    warn!("dropping candidate from {}: {}", peer_id, e);
                }
            }
        }
    }

    async fn handle_offer(&mut self, peer_id: ParticipantId, sdp: String) {
        if let Some(entry) = self.registry.get_mut(&peer_id) {
            if entry.state.offer_outstanding() && self.local_id > peer_id {
                // Glare: both sides offered. The higher id keeps its offer
                // and lets the polite peer answer.
                debug!("ignoring glare offer from {}", peer_id);
                return;
            }
            // Either we are the polite side of the glare or the peer
            // restarted its negotiation; the old connection is stale both
            // ways, so answer on a fresh one.
            self.registry.remove(&peer_id).await;
        }

        if let Err(e) = self.send_answer(&peer_id, sdp).await {
            self.report_setup_failure(peer_id, e).await;
        }
    }

    /// member-joined path: fresh entry, local offer, send.
    async fn send_offer(&mut self, peer_id: &ParticipantId) -> Result<(), RoomError> {
        let local = self.acquire_local_stream(peer_id).await?;
        let entry = self.registry.get_or_create(peer_id, &local).await?;

        let sdp = entry.connection.create_offer().await.map_err(|source| {
            RoomError::ConnectionSetupFailed {
                peer_id: peer_id.clone(),
                source,
            }
        })?;
        entry.state = NegotiationState::OfferCreated;

        self.send_signal(peer_id, SignalMessage::Offer { sdp }).await;
        if let Some(entry) = self.registry.get_mut(peer_id) {
            entry.state = NegotiationState::OfferSent;
        }
        Ok(())
    }

    /// offer-received path: fresh entry, remote description, local answer,
    /// send.
    async fn send_answer(&mut self, peer_id: &ParticipantId, remote_sdp: String) -> Result<(), RoomError> {
        let local = self.acquire_local_stream(peer_id).await?;
        let entry = self.registry.get_or_create(peer_id, &local).await?;

        entry
            .connection
            .set_remote_description(SdpKind::Offer, remote_sdp)
            .await
            .map_err(|source| RoomError::ConnectionSetupFailed {
                peer_id: peer_id.clone(),
                source,
            })?;
        entry.mark_remote_description();

        let sdp = entry.connection.create_answer().await.map_err(|source| {
            RoomError::ConnectionSetupFailed {
                peer_id: peer_id.clone(),
                source,
            }
        })?;
        entry.state = NegotiationState::AnswerCreated;

        self.send_signal(peer_id, SignalMessage::Answer { sdp }).await;
        if let Some(entry) = self.registry.get_mut(peer_id) {
            entry.state = NegotiationState::AnswerSent;
        }
        Ok(())
    }

    /// answer-received path. Only the first answer is applied; duplicates
    /// and late answers are ignored once a remote description is set.
    async fn apply_answer(&mut self, peer_id: &ParticipantId, sdp: String) -> Result<(), RoomError> {
        let entry = self
            .registry
            .get_mut(peer_id)
            .ok_or_else(|| RoomError::UnknownPeer {
                peer_id: peer_id.clone(),
            })?;

        if entry.remote_description_set() {
            debug!("ignoring duplicate answer from {}", peer_id);
            return Ok(());
        }

        entry
            .connection
            .set_remote_description(SdpKind::Answer, sdp)
            .await
            .map_err(|source| RoomError::ConnectionSetupFailed {
                peer_id: peer_id.clone(),
                source,
            })?;
        entry.mark_remote_description();

        // Candidates that raced ahead of the answer, in receipt order.
        for candidate in entry.take_pending() {
            if let Err(e) = entry.connection.add_ice_candidate(candidate).await {
                warn!("failed to apply queued candidate for {}: {:#}", peer_id, e);
            }
        }
        Ok(())
    }

    async fn apply_candidate(
        &mut self,
        peer_id: &ParticipantId,
        candidate: IceCandidate,
    ) -> Result<(), RoomError> {
        let entry = self
            .registry
            .get_mut(peer_id)
            .ok_or_else(|| RoomError::UnknownPeer {
                peer_id: peer_id.clone(),
            })?;

        if entry.remote_description_set() {
            if let Err(e) = entry.connection.add_ice_candidate(candidate).await {
                warn!("failed to apply candidate from {}: {:#}", peer_id, e);
            }
        } else {
            entry.push_pending(candidate);
        }
        Ok(())
    }

    /// A local candidate surfaced by a media connection. The callback may
    /// outlive the negotiation, so registry membership is the guard
    /// against relaying for a peer we already dropped.
    async fn handle_local_candidate(&mut self, peer_id: ParticipantId, candidate: IceCandidate) {
        if !self.registry.contains(&peer_id) {
            debug!("discarding local candidate for removed peer {}", peer_id);
            return;
        }
        self.send_signal(&peer_id, SignalMessage::Candidate(candidate))
            .await;
    }

    async fn handle_track(&mut self, peer_id: ParticipantId, stream: RemoteStream) {
        if !self.registry.contains(&peer_id) {
            debug!("discarding remote track for removed peer {}", peer_id);
            return;
        }
        info!("remote media ready for {}", peer_id);
        self.observer.on_remote_stream_ready(peer_id, stream).await;
    }

    async fn handle_connection_state(&mut self, peer_id: ParticipantId, state: ConnectionState) {
        match state {
            ConnectionState::Connected => {
                if let Some(entry) = self.registry.get_mut(&peer_id) {
                    info!("peer {} connected", peer_id);
                    entry.state = NegotiationState::Connected;
                }
            }
            ConnectionState::Disconnected | ConnectionState::Failed | ConnectionState::Closed => {
                if self.registry.remove(&peer_id).await {
                    info!("peer {} connection {:?}", peer_id, state);
                    self.observer.on_peer_disconnected(peer_id).await;
                }
            }
            ConnectionState::New | ConnectionState::Connecting => {}
        }
    }

    /// Acquired once, lazily, and shared across every peer connection.
    async fn acquire_local_stream(
        &mut self,
        peer_id: &ParticipantId,
    ) -> Result<Arc<LocalStream>, RoomError> {
        if let Some(stream) = &self.local_stream {
            return Ok(stream.clone());
        }
        let stream = self
            .media
            .acquire(&self.constraints)
            .await
            .map_err(|source| RoomError::ConnectionSetupFailed {
                peer_id: peer_id.clone(),
                source,
            })?;
        self.local_stream = Some(stream.clone());
        Ok(stream)
    }

    async fn send_signal(&self, peer_id: &ParticipantId, msg: SignalMessage) {
        let payload = codec::encode(&msg);
        if let Err(e) = self.transport.send_to_peer(peer_id, payload).await {
            // The peer may already be gone; signaling sends are
            // fire-and-forget and never retried.
            warn!("failed to send signal to {}: {:#}", peer_id, e);
        }
    }

    async fn report_setup_failure(&mut self, peer_id: ParticipantId, error: RoomError) {
        error!("negotiation setup failed for {}: {}", peer_id, error);
        // Drop whatever half-built entry the failed path left behind.
        self.registry.remove(&peer_id).await;
        self.observer
            .on_setup_error(peer_id, error.to_string())
            .await;
    }

    async fn teardown(&mut self) {
        for peer_id in self.registry.drain().await {
            self.observer.on_peer_disconnected(peer_id).await;
        }
        self.local_stream = None;
    }
}
