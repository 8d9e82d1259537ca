use huddle_core::model::{IceServerConfig, MediaConstraints};

/// STUN pair used when the embedder supplies no ICE servers.
pub const DEFAULT_STUN_SERVERS: [&str; 2] = [
    "stun:stun1.l.google.com:19302",
    "stun:stun2.l.google.com:19302",
];

#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub constraints: MediaConstraints,
    /// Depth of the per-room event queue; producers back-pressure when full.
    pub event_queue_depth: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: DEFAULT_STUN_SERVERS.iter().map(|s| s.to_string()).collect(),
                username: None,
                credential: None,
            }],
            constraints: MediaConstraints::default(),
            event_queue_depth: 256,
        }
    }
}
