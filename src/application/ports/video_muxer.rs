use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Replaces a video's audio track with a new waveform, copying the video
/// stream unmodified where the backend supports it.
#[async_trait]
pub trait VideoMuxer: Send + Sync {
    async fn replace_audio(
        &self,
        source_video: &Path,
        new_audio: &Path,
        output_video: &Path,
    ) -> Result<PathBuf, MuxError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    #[error("input file not found: {0}")]
    InputNotFound(String),
    #[error("mux failed: {0}")]
    MuxFailed(String),
    #[error("mux timed out after {0} seconds")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
