use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};

use huddle_core::model::{IceCandidate, MediaConstraints, ParticipantId};
use huddle_engine::{
    LocalMediaProvider, LocalStream, MediaConnection, MediaConnectionFactory, RoomEvent, SdpKind,
    StaticMediaProvider,
};

/// One recorded operation on a mock media connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    CreateOffer,
    CreateAnswer,
    SetRemoteOffer(String),
    SetRemoteAnswer(String),
    AddCandidate(IceCandidate),
    Close,
}

type CallLog = Arc<Mutex<HashMap<ParticipantId, Vec<MediaCall>>>>;

/// Scripted media-connection factory: returns canned SDP, records every
/// call keyed by peer, and can be told to fail construction for a peer.
#[derive(Clone, Default)]
pub struct MockMediaFactory {
    calls: CallLog,
    created: Arc<AtomicUsize>,
    failing: Arc<Mutex<HashSet<ParticipantId>>>,
}

impl MockMediaFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make construction fail for this peer, as if no ICE server is
    /// reachable.
    pub async fn fail_creation_for(&self, peer_id: &ParticipantId) {
        self.failing.lock().await.insert(peer_id.clone());
    }

    /// How many connections were successfully constructed, across peers.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Every call made on any connection created for this peer, in order.
    pub async fn calls_for(&self, peer_id: &ParticipantId) -> Vec<MediaCall> {
        self.calls
            .lock()
            .await
            .get(peer_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl MediaConnectionFactory for MockMediaFactory {
    async fn create(
        &self,
        peer_id: &ParticipantId,
        _local: &LocalStream,
        _events: mpsc::Sender<RoomEvent>,
    ) -> anyhow::Result<Box<dyn MediaConnection>> {
        if self.failing.lock().await.contains(peer_id) {
            anyhow::bail!("no ICE servers reachable");
        }
        let serial = self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            peer_id: peer_id.clone(),
            serial,
            calls: self.calls.clone(),
        }))
    }
}

pub struct MockConnection {
    peer_id: ParticipantId,
    serial: usize,
    calls: CallLog,
}

impl MockConnection {
    async fn record(&self, call: MediaCall) {
        self.calls
            .lock()
            .await
            .entry(self.peer_id.clone())
            .or_default()
            .push(call);
    }
}

#[async_trait]
impl MediaConnection for MockConnection {
    async fn create_offer(&self) -> anyhow::Result<String> {
        self.record(MediaCall::CreateOffer).await;
        Ok(format!("offer-sdp-{}-{}", self.peer_id, self.serial))
    }

    async fn create_answer(&self) -> anyhow::Result<String> {
        self.record(MediaCall::CreateAnswer).await;
        Ok(format!("answer-sdp-{}-{}", self.peer_id, self.serial))
    }

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> anyhow::Result<()> {
        let call = match kind {
            SdpKind::Offer => MediaCall::SetRemoteOffer(sdp),
            SdpKind::Answer => MediaCall::SetRemoteAnswer(sdp),
        };
        self.record(call).await;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> anyhow::Result<()> {
        self.record(MediaCall::AddCandidate(candidate)).await;
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.record(MediaCall::Close).await;
        Ok(())
    }
}

/// Local media provider counting acquisitions, to assert the stream is
/// acquired lazily and exactly once per room.
#[derive(Clone, Default)]
pub struct CountingMediaProvider {
    acquires: Arc<AtomicUsize>,
}

impl CountingMediaProvider {
    pub fn acquire_count(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalMediaProvider for CountingMediaProvider {
    async fn acquire(&self, constraints: &MediaConstraints) -> anyhow::Result<Arc<LocalStream>> {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        StaticMediaProvider.acquire(constraints).await
    }
}
