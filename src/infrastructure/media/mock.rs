use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::ports::{AudioExtractor, ExtractionError, MuxError, VideoMuxer};

/// Extractor stand-in that writes a stub waveform instead of invoking a
/// codec tool.
pub struct MockAudioExtractor {
    calls: AtomicUsize,
}

impl MockAudioExtractor {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockAudioExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioExtractor for MockAudioExtractor {
    async fn extract(
        &self,
        video: &Path,
        output_audio: &Path,
    ) -> Result<PathBuf, ExtractionError> {
        if !tokio::fs::try_exists(video).await.unwrap_or(false) {
            return Err(ExtractionError::InputNotFound(video.display().to_string()));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(output_audio, b"stub-extracted-audio").await?;
        Ok(output_audio.to_path_buf())
    }
}

/// Muxer stand-in that concatenates its inputs into the output file.
pub struct MockVideoMuxer {
    calls: AtomicUsize,
}

impl MockVideoMuxer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockVideoMuxer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoMuxer for MockVideoMuxer {
    async fn replace_audio(
        &self,
        source_video: &Path,
        new_audio: &Path,
        output_video: &Path,
    ) -> Result<PathBuf, MuxError> {
        let mut merged = tokio::fs::read(source_video).await?;
        merged.extend(tokio::fs::read(new_audio).await?);
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(output_video, merged).await?;
        Ok(output_video.to_path_buf())
    }
}
