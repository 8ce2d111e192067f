mod artifact_store;
mod audio_extractor;
mod punctuation_restorer;
mod run_cache;
mod transcriber;
mod video_muxer;
mod voice_cloner;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use audio_extractor::{AudioExtractor, ExtractionError};
pub use punctuation_restorer::{PunctuationRestorer, RestorationError};
pub use run_cache::{CacheBegin, CacheError, RunCache};
pub use transcriber::{Transcriber, TranscriptionError};
pub use video_muxer::{MuxError, VideoMuxer};
pub use voice_cloner::{SynthesisError, SynthesisRequest, SynthesizedAudio, VoiceCloner};
