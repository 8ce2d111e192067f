use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::SubstitutionRule;

/// Stable hash of every input that determines a run's variant set. Two runs
/// with equal fingerprints resolve to the same cache entry and never
/// synthesize twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFingerprint(String);

impl RunFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fingerprint payload. Rule order is part of the identity: first-match
/// substitution makes reordered rules a different run.
#[derive(Debug, Serialize)]
pub struct FingerprintInputs<'a> {
    pub source_content_hash: &'a str,
    pub language: &'a str,
    pub transcription_model: &'a str,
    pub punctuation_model: &'a str,
    pub threshold: u8,
    pub rules: &'a [SubstitutionRule],
}

impl FingerprintInputs<'_> {
    pub fn fingerprint(&self) -> RunFingerprint {
        // serde_json keeps struct field order, so the payload is stable.
        let payload = serde_json::to_vec(self).expect("fingerprint payload serializes");
        let mut hasher = Sha256::new();
        hasher.update(&payload);
        RunFingerprint(hex_encode(&hasher.finalize()))
    }
}

/// SHA-256 of raw bytes, hex-encoded. Used for the source-media content hash.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
