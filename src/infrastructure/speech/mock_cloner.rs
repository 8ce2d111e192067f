use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{
    SynthesisError, SynthesisRequest, SynthesizedAudio, VoiceCloner,
};

/// Scripted voice cloner: writes a stub waveform to the requested output
/// path, records every target text, and can be told to fail for targets
/// containing a marker substring. Tracks how many calls overlapped so pool
/// bounds can be asserted.
pub struct MockVoiceCloner {
    sample_rate: u32,
    fail_marker: Option<String>,
    delay: std::time::Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    synthesized: Mutex<Vec<String>>,
}

impl MockVoiceCloner {
    pub fn new() -> Self {
        Self {
            sample_rate: 24_000,
            fail_marker: None,
            delay: std::time::Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            synthesized: Mutex::new(Vec::new()),
        }
    }

    /// Synthesis fails for any target text containing `marker`.
    pub fn failing_on(marker: impl Into<String>) -> Self {
        Self {
            fail_marker: Some(marker.into()),
            ..Self::new()
        }
    }

    /// Each call holds its slot for `delay`, so overlapping calls register
    /// as concurrent.
    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Largest number of synthesize calls observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn synthesized_texts(&self) -> Vec<String> {
        self.synthesized
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl Default for MockVoiceCloner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VoiceCloner for MockVoiceCloner {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        let result = self.synthesize_inner(request).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl MockVoiceCloner {
    async fn synthesize_inner(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(marker) = &self.fail_marker {
            if request.target_text.contains(marker.as_str()) {
                return Err(SynthesisError::SynthesisFailed(format!(
                    "mock cloner rejects '{}'",
                    request.target_text
                )));
            }
        }

        tokio::fs::write(&request.output_path, request.target_text.as_bytes())
            .await
            .map_err(|e| SynthesisError::SynthesisFailed(e.to_string()))?;

        self.synthesized
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.target_text.clone());

        Ok(SynthesizedAudio {
            path: request.output_path,
            sample_rate: self.sample_rate,
        })
    }
}
