use async_trait::async_trait;

/// Restores punctuation and capitalization on a raw variant string. Failure
/// is non-fatal by contract: callers fall back to the unrestored text.
#[async_trait]
pub trait PunctuationRestorer: Send + Sync {
    async fn restore(&self, raw: &str) -> Result<String, RestorationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RestorationError {
    #[error("restoration failed: {0}")]
    RestorationFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("restoration timed out after {0} seconds")]
    Timeout(u64),
}
