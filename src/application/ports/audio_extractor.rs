use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Pulls the audio track out of a video file. The core never touches codecs
/// itself; this is a boundary to an external tool.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, video: &Path, output_audio: &Path)
        -> Result<PathBuf, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("input video not found: {0}")]
    InputNotFound(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("extraction timed out after {0} seconds")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
