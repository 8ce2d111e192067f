use serde::{Deserialize, Serialize};

/// One fully-substituted candidate transcript. `index` is the position in
/// the deterministic generation order; downstream naming and job bookkeeping
/// key off it rather than completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTranscript {
    pub index: usize,
    pub text: String,
    /// False when punctuation restoration failed and the raw joined text
    /// was kept as a fallback.
    pub restored: bool,
}

impl VariantTranscript {
    pub fn new(index: usize, text: String, restored: bool) -> Self {
        Self {
            index,
            text,
            restored,
        }
    }
}
