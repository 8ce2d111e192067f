use serde::{Deserialize, Serialize};

/// One replacement rule supplied by the caller: a key to fuzzy-match against
/// transcript tokens and the candidates that may stand in for a matched
/// token. Rule order is caller order and is significant for tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    pub key: String,
    pub candidates: Vec<String>,
}

impl SubstitutionRule {
    pub fn new(key: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            key: key.into(),
            candidates,
        }
    }
}

/// Minimum similarity score (0-100) a rule key must reach against a token.
pub const MAX_THRESHOLD: u8 = 100;

pub fn validate_threshold(threshold: u8) -> Result<(), String> {
    if threshold > MAX_THRESHOLD {
        return Err(format!(
            "threshold must be between 0 and {}, got {}",
            MAX_THRESHOLD, threshold
        ));
    }
    Ok(())
}
