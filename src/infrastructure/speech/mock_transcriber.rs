use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{Transcriber, TranscriptionError};

/// Scripted transcriber for tests and model-less wiring: returns a fixed
/// transcript and counts calls.
pub struct MockTranscriber {
    transcript: String,
    calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn returning(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio: &Path,
        _language: &str,
    ) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.transcript.clone())
    }
}
