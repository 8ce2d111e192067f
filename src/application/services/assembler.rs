use std::collections::HashSet;
use std::sync::Arc;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, MuxError, VideoMuxer,
};
use crate::application::services::external::{call_with_retry, CallPolicy};
use crate::domain::transcript::distinguishing_words;
use crate::domain::{MediaKind, PipelineRun, SynthesisJob, WorkPath};

/// Turns one synthesized waveform into the run's final artifact for that
/// variant: the waveform itself for audio runs, a remuxed video otherwise.
/// Artifacts are named by the variant's distinguishing words so an output
/// file reads back to the substitution that produced it.
pub struct MediaAssembler {
    muxer: Arc<dyn VideoMuxer>,
    store: Arc<dyn ArtifactStore>,
    policy: CallPolicy,
}

impl MediaAssembler {
    pub fn new(muxer: Arc<dyn VideoMuxer>, store: Arc<dyn ArtifactStore>, policy: CallPolicy) -> Self {
        Self {
            muxer,
            store,
            policy,
        }
    }

    /// `taken` carries the filename stems already used within this run;
    /// colliding stems get a `_2`, `_3`, ... suffix in assembly order.
    pub async fn assemble(
        &self,
        run: &PipelineRun,
        job: &SynthesisJob,
        taken: &mut HashSet<String>,
    ) -> Result<WorkPath, AssemblyError> {
        let variant = run
            .variants
            .iter()
            .find(|v| v.index == job.variant_index)
            .ok_or(AssemblyError::VariantMissing(job.variant_index))?;
        let waveform = job
            .waveform
            .as_ref()
            .ok_or(AssemblyError::WaveformMissing(job.variant_index))?;
        let original = run
            .raw_transcript
            .as_deref()
            .ok_or(AssemblyError::TranscriptMissing)?;

        let stem = artifact_stem(original, &variant.text, taken);

        let artifact = match run.source.kind {
            MediaKind::Audio => {
                let artifact = WorkPath::new(&run.id, &format!("{}.wav", stem));
                let bytes = self.store.fetch(waveform).await?;
                self.store.put(&artifact, &bytes).await?;
                artifact
            }
            MediaKind::Video => {
                let artifact = WorkPath::new(&run.id, &format!("{}.mp4", stem));
                let waveform_path = self.store.local_path(waveform);
                let output_path = self.store.local_path(&artifact);
                call_with_retry(&self.policy, "video mux", MuxError::Timeout, || {
                    self.muxer
                        .replace_audio(&run.source.path, &waveform_path, &output_path)
                })
                .await?;
                artifact
            }
        };

        tracing::debug!(
            run_id = %run.id,
            variant_index = job.variant_index,
            artifact = %artifact,
            "Assembled artifact"
        );

        Ok(artifact)
    }
}

/// Distinguishing words joined by underscores, `original` when the variant
/// introduces no new words, de-collided against `taken`.
fn artifact_stem(original: &str, variant: &str, taken: &mut HashSet<String>) -> String {
    let words = distinguishing_words(original, variant);
    let base = if words.is_empty() {
        "original".to_string()
    } else {
        words.join("_")
    };

    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("variant {0} not found on run")]
    VariantMissing(usize),
    #[error("no synthesized waveform for variant {0}")]
    WaveformMissing(usize),
    #[error("run has no transcript")]
    TranscriptMissing,
    #[error("mux: {0}")]
    Mux(#[from] MuxError),
    #[error("store: {0}")]
    Store(#[from] ArtifactStoreError),
}
