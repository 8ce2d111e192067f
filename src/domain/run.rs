use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    JobStatus, RunFingerprint, RunId, SourceMedia, SubstitutionRule, SynthesisJob,
    VariantTranscript, WorkPath,
};

/// Model selection for a run, fixed at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    pub language: String,
    pub transcription_model: String,
    pub punctuation_model: String,
}

/// Stage of a run. Reached states only ever move forward; `Failed` and
/// `Cancelled` are terminal and reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    Created,
    Extracting,
    Transcribing,
    AwaitingSubstitutionInput,
    GeneratingVariants,
    Synthesizing,
    Assembling,
    Complete,
    Failed,
    Cancelled,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Created => "CREATED",
            RunState::Extracting => "EXTRACTING",
            RunState::Transcribing => "TRANSCRIBING",
            RunState::AwaitingSubstitutionInput => "AWAITING_SUBSTITUTION_INPUT",
            RunState::GeneratingVariants => "GENERATING_VARIANTS",
            RunState::Synthesizing => "SYNTHESIZING",
            RunState::Assembling => "ASSEMBLING",
            RunState::Complete => "COMPLETE",
            RunState::Failed => "FAILED",
            RunState::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Complete | RunState::Failed | RunState::Cancelled)
    }

    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        if self.is_terminal() {
            return false;
        }
        if matches!(next, Failed | Cancelled) {
            return true;
        }
        matches!(
            (self, next),
            (Created, Extracting)
                | (Created, Transcribing)
                | (Extracting, Transcribing)
                | (Transcribing, AwaitingSubstitutionInput)
                | (AwaitingSubstitutionInput, GeneratingVariants)
                | (GeneratingVariants, Synthesizing)
                | (Synthesizing, Assembling)
                | (Assembling, Complete)
        )
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate root for one pipeline run. Serializable so a run parked at
/// `AwaitingSubstitutionInput` (or finished) can live outside the process;
/// there is no session state anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: RunId,
    pub source: SourceMedia,
    pub params: RunParams,
    pub state: RunState,
    /// Copy of the source media inside the run's working directory.
    pub staged_source: Option<WorkPath>,
    /// SHA-256 of the source bytes; part of the run fingerprint.
    pub source_content_hash: Option<String>,
    /// Present for video runs after extraction; audio runs reference the
    /// staged source directly.
    pub extracted_audio: Option<WorkPath>,
    pub raw_transcript: Option<String>,
    pub threshold: Option<u8>,
    pub rules: Vec<SubstitutionRule>,
    pub variants: Vec<VariantTranscript>,
    pub jobs: Vec<SynthesisJob>,
    pub fingerprint: Option<RunFingerprint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PipelineRun {
    pub fn new(source: SourceMedia, params: RunParams) -> Self {
        let now = Utc::now();
        Self {
            id: RunId::new(),
            source,
            params,
            state: RunState::Created,
            staged_source: None,
            source_content_hash: None,
            extracted_audio: None,
            raw_transcript: None,
            threshold: None,
            rules: Vec::new(),
            variants: Vec::new(),
            jobs: Vec::new(),
            fingerprint: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the run to `next`, rejecting transitions the state machine
    /// does not allow.
    pub fn transition_to(&mut self, next: RunState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Audio used as the cloning reference: the extracted track for video
    /// runs, the staged source for audio runs.
    pub fn reference_audio(&self) -> Option<&WorkPath> {
        self.extracted_audio.as_ref().or(self.staged_source.as_ref())
    }

    pub fn job_mut(&mut self, variant_index: usize) -> Option<&mut SynthesisJob> {
        self.jobs.iter_mut().find(|j| j.variant_index == variant_index)
    }

    pub fn succeeded_jobs(&self) -> impl Iterator<Item = &SynthesisJob> {
        self.jobs.iter().filter(|j| j.status == JobStatus::Succeeded)
    }

    /// Artifacts in variant order, independent of job completion order.
    pub fn artifacts(&self) -> Vec<&WorkPath> {
        let mut succeeded: Vec<&SynthesisJob> =
            self.jobs.iter().filter(|j| j.artifact.is_some()).collect();
        succeeded.sort_by_key(|j| j.variant_index);
        succeeded.iter().filter_map(|j| j.artifact.as_ref()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid run transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: RunState,
    pub to: RunState,
}
