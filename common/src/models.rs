use crate::ring::RingSignature;
use serde::{Deserialize, Serialize};

/// Human-readable view of a signature for CLI output via JSON
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureSummary {
    /// Randomizer v (decimal string)
    pub v: String,
    /// First ring value (decimal string)
    pub y1: String,
    /// Second ring value (decimal string)
    pub y2: String,
    /// Ephemeral AES key (hex string)
    pub key: String,
}

impl From<&RingSignature> for SignatureSummary {
    fn from(sig: &RingSignature) -> Self {
        Self {
            v: sig.v.to_string(),
            y1: sig.y1.to_string(),
            y2: sig.y2.to_string(),
            key: hex::encode(sig.key),
        }
    }
}
