use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

/// Capture resolution bounds handed to the local media provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoConstraints {
    pub min_width: u32,
    pub ideal_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub ideal_height: u32,
    pub max_height: u32,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            min_width: 640,
            ideal_width: 1920,
            max_width: 1920,
            min_height: 480,
            ideal_height: 1080,
            max_height: 1080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: VideoConstraints,
    pub audio: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video: VideoConstraints::default(),
            audio: true,
        }
    }
}
