use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// One ICE candidate as relayed between peers. Field names match the
/// browser's `RTCIceCandidateInit` so payloads survive a round-trip
/// through browser clients untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

/// Peer-to-peer negotiation payload. Always addressed to exactly one
/// participant; the transport only carries it, the engine interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    Offer { sdp: String },
    Answer { sdp: String },
    Candidate(IceCandidate),
}
