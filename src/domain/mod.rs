mod fingerprint;
mod ids;
mod job;
mod media;
mod run;
mod substitution;
pub mod transcript;
mod variant;
mod work_path;

pub use fingerprint::{content_hash, FingerprintInputs, RunFingerprint};
pub use ids::{RunId, SynthesisJobId};
pub use job::{JobStatus, SynthesisJob};
pub use media::{MediaKind, SourceMedia};
pub use run::{InvalidTransition, PipelineRun, RunParams, RunState};
pub use substitution::{validate_threshold, SubstitutionRule, MAX_THRESHOLD};
pub use variant::VariantTranscript;
pub use work_path::WorkPath;
