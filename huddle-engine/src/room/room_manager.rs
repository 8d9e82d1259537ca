use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

use huddle_core::model::{ParticipantId, RoomId};

use crate::config::RoomConfig;
use crate::media::{LocalMediaProvider, MediaConnectionFactory};
use crate::observer::RoomObserver;
use crate::room::room::{Room, RoomHandle};
use crate::room::room_event::RoomEvent;
use crate::signaling::SignalingTransport;

/// Spawns and tracks one [`Room`] engine task per joined room.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<String, RoomHandle>>,
    local_id: ParticipantId,
    config: RoomConfig,
    factory: Arc<dyn MediaConnectionFactory>,
    media: Arc<dyn LocalMediaProvider>,
    transport: Arc<dyn SignalingTransport>,
    observer: Arc<dyn RoomObserver>,
}

impl RoomManager {
    pub fn new(
        local_id: ParticipantId,
        config: RoomConfig,
        factory: Arc<dyn MediaConnectionFactory>,
        media: Arc<dyn LocalMediaProvider>,
        transport: Arc<dyn SignalingTransport>,
        observer: Arc<dyn RoomObserver>,
    ) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            local_id,
            config,
            factory,
            media,
            transport,
            observer,
        }
    }

    /// Handle for `room_id`, spawning its engine on first join. Joining a
    /// room twice returns the same handle.
    pub fn join(&self, room_id: &str) -> RoomHandle {
        if let Some(handle) = self.rooms.get(room_id) {
            return handle.clone();
        }

        info!("joining room {}", room_id);
        let (room, handle) = Room::new(
            RoomId::from(room_id),
            self.local_id.clone(),
            self.config.clone(),
            self.factory.clone(),
            self.media.clone(),
            self.transport.clone(),
            self.observer.clone(),
        );
        tokio::spawn(room.run());

        self.rooms.insert(room_id.to_string(), handle.clone());
        handle
    }

    pub fn is_joined(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Leave and forget the room; its engine tears down every negotiation
    /// and exits.
    pub async fn leave(&self, room_id: &str) {
        let Some((_, handle)) = self.rooms.remove(room_id) else {
            return;
        };
        info!("leaving room {}", room_id);
        let _ = handle.send(RoomEvent::Leave).await;
    }
}
