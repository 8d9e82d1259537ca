//! Text codec for [`SignalMessage`] payloads.
//!
//! Decode failures are recoverable by contract: a message with a missing or
//! unknown tag, or an unparsable body, is dropped by the caller and must
//! never take the negotiation loop down.

use crate::model::SignalMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed signaling message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serialize a signaling message to its wire text payload.
///
/// Infallible: every `SignalMessage` field is a plain string or integer,
/// none of which can fail to serialize.
pub fn encode(msg: &SignalMessage) -> String {
    serde_json::to_string(msg).expect("SignalMessage serializes infallibly")
}

pub fn decode(text: &str) -> Result<SignalMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}
