use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioExtractor, ExtractionError, MuxError, VideoMuxer};

/// ffmpeg-backed codec boundary. The core never inspects media itself; it
/// hands paths to the ffmpeg binary and checks the exit status.
pub struct FfmpegAudioExtractor {
    binary: PathBuf,
}

impl FfmpegAudioExtractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegAudioExtractor {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    async fn extract(
        &self,
        video: &Path,
        output_audio: &Path,
    ) -> Result<PathBuf, ExtractionError> {
        if !tokio::fs::try_exists(video).await.unwrap_or(false) {
            return Err(ExtractionError::InputNotFound(video.display().to_string()));
        }

        tracing::info!(video = %video.display(), "Extracting audio track");
        // A timed-out call drops this future; the child must die with it or
        // a retry would race the orphan over the same output path.
        let mut child = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(video)
            .args(["-ac", "2", "-ar", "44100", "-vn"])
            .arg(output_audio)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let status = child.wait().await?;

        if !status.success() {
            return Err(ExtractionError::ExtractionFailed(format!(
                "ffmpeg exited with {}",
                status
            )));
        }
        Ok(output_audio.to_path_buf())
    }
}

pub struct FfmpegVideoMuxer {
    binary: PathBuf,
}

impl FfmpegVideoMuxer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegVideoMuxer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl VideoMuxer for FfmpegVideoMuxer {
    async fn replace_audio(
        &self,
        source_video: &Path,
        new_audio: &Path,
        output_video: &Path,
    ) -> Result<PathBuf, MuxError> {
        for input in [source_video, new_audio] {
            if !tokio::fs::try_exists(input).await.unwrap_or(false) {
                return Err(MuxError::InputNotFound(input.display().to_string()));
            }
        }

        tracing::info!(
            video = %source_video.display(),
            audio = %new_audio.display(),
            "Remuxing with replacement audio track"
        );
        // The video stream is copied, not re-encoded; only the audio track
        // changes. Killed on drop so a timed-out call never leaves an orphan
        // writing the output path.
        let mut child = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(source_video)
            .arg("-i")
            .arg(new_audio)
            .args(["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-shortest"])
            .arg(output_video)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let status = child.wait().await?;

        if !status.success() {
            return Err(MuxError::MuxFailed(format!("ffmpeg exited with {}", status)));
        }
        Ok(output_video.to_path_buf())
    }
}
