use std::path::PathBuf;

use async_trait::async_trait;

/// One cloning request: synthesize `target_text` in the voice of the
/// reference recording, writing the waveform to `output_path`.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub reference_audio: PathBuf,
    pub reference_text: String,
    pub target_text: String,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub path: PathBuf,
    pub sample_rate: u32,
}

/// Voice-cloning text-to-speech capability. Backends are commonly
/// GPU-exclusive; concurrency is bounded by the orchestrator's worker pool,
/// not here.
#[async_trait]
pub trait VoiceCloner: Send + Sync {
    async fn synthesize(&self, request: SynthesisRequest)
        -> Result<SynthesizedAudio, SynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("reference audio not found: {0}")]
    ReferenceNotFound(String),
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("synthesis timed out after {0} seconds")]
    Timeout(u64),
}
