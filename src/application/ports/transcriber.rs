use std::path::Path;

use async_trait::async_trait;

/// Speech-to-text capability. Implementations are typically single-instance
/// and stateful; the orchestrator serializes calls per run.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path, language: &str)
        -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio file not found: {0}")]
    AudioNotFound(String),
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("transcription timed out after {0} seconds")]
    Timeout(u64),
}
