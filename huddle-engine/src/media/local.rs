use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use huddle_core::model::{MediaConstraints, TrackKind};

/// One capture track. The enabled flag is shared with whatever produces
/// the media, so muting a track takes effect without renegotiation.
#[derive(Debug, Clone)]
pub struct LocalTrack {
    id: String,
    kind: TrackKind,
    enabled: Arc<AtomicBool>,
}

impl LocalTrack {
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

/// The local capture stream. Acquired once per room, lazily, and shared
/// read-only across every peer connection; dropped when the room is left.
#[derive(Debug, Default)]
pub struct LocalStream {
    tracks: Vec<LocalTrack>,
}

impl LocalStream {
    pub fn new(tracks: Vec<LocalTrack>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn track(&self, kind: TrackKind) -> Option<&LocalTrack> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    pub fn set_enabled(&self, kind: TrackKind, enabled: bool) {
        if let Some(track) = self.track(kind) {
            track.set_enabled(enabled);
        }
    }

    /// Flip one kind of track (camera or mic button), returning the new
    /// enabled state, or `None` when the stream has no such track.
    pub fn toggle(&self, kind: TrackKind) -> Option<bool> {
        let track = self.track(kind)?;
        let enabled = !track.is_enabled();
        track.set_enabled(enabled);
        Some(enabled)
    }
}

/// Supplies the local capture stream. Actual capture is platform work and
/// lives outside the engine; implementations hand back track descriptors
/// whose enabled flags the capture side observes.
#[async_trait]
pub trait LocalMediaProvider: Send + Sync {
    async fn acquire(&self, constraints: &MediaConstraints) -> anyhow::Result<Arc<LocalStream>>;
}

/// Provider for hosts that run capture elsewhere and only need the
/// engine-side descriptors: one video track, plus audio when asked for.
pub struct StaticMediaProvider;

#[async_trait]
impl LocalMediaProvider for StaticMediaProvider {
    async fn acquire(&self, constraints: &MediaConstraints) -> anyhow::Result<Arc<LocalStream>> {
        let mut tracks = vec![LocalTrack::new("camera", TrackKind::Video)];
        if constraints.audio {
            tracks.push(LocalTrack::new("mic", TrackKind::Audio));
        }
        Ok(Arc::new(LocalStream::new(tracks)))
    }
}
