mod assembler;
mod cancel;
mod external;
mod orchestrator;
mod packager;
pub mod substitution_engine;
mod variant_generator;

pub use assembler::{AssemblyError, MediaAssembler};
pub use cancel::CancelFlag;
pub use external::{call_with_retry, CallPolicy};
pub use orchestrator::{PipelineError, PipelineOrchestrator};
pub use packager::{Packager, PackagingError, ARCHIVE_NAME};
pub use substitution_engine::{candidates_for, similarity_ratio};
pub use variant_generator::{VariantError, VariantGenerator};
