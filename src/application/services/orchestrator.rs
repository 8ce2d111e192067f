use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::stream;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, AudioExtractor, CacheBegin, CacheError, ExtractionError,
    PunctuationRestorer, RunCache, SynthesisError, SynthesisRequest, Transcriber,
    TranscriptionError, VideoMuxer, VoiceCloner,
};
use crate::application::services::assembler::MediaAssembler;
use crate::application::services::cancel::CancelFlag;
use crate::application::services::external::{call_with_retry, CallPolicy};
use crate::application::services::variant_generator::{VariantError, VariantGenerator};
use crate::config::PipelineSettings;
use crate::domain::{
    content_hash, validate_threshold, FingerprintInputs, JobStatus, MediaKind, PipelineRun,
    RunParams, RunState, SourceMedia, SubstitutionRule, SynthesisJob, WorkPath,
};

/// Drives a run through its stages. `start` takes a source recording to the
/// `AwaitingSubstitutionInput` suspension point and hands the run back to
/// the caller; `resume` takes the caller's substitution input to a terminal
/// state. No state lives in the orchestrator between the two calls; a
/// parked run can sit outside the process indefinitely.
pub struct PipelineOrchestrator {
    extractor: Arc<dyn AudioExtractor>,
    transcriber: Arc<dyn Transcriber>,
    cloner: Arc<dyn VoiceCloner>,
    generator: VariantGenerator,
    assembler: MediaAssembler,
    store: Arc<dyn ArtifactStore>,
    cache: Arc<dyn RunCache>,
    worker_pool_size: usize,
    policy: CallPolicy,
}

impl PipelineOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        extractor: Arc<dyn AudioExtractor>,
        transcriber: Arc<dyn Transcriber>,
        restorer: Arc<dyn PunctuationRestorer>,
        cloner: Arc<dyn VoiceCloner>,
        muxer: Arc<dyn VideoMuxer>,
        store: Arc<dyn ArtifactStore>,
        cache: Arc<dyn RunCache>,
        settings: &PipelineSettings,
    ) -> Self {
        let policy = settings.call_policy();
        Self {
            extractor,
            transcriber,
            cloner,
            generator: VariantGenerator::new(restorer, settings.max_variants),
            assembler: MediaAssembler::new(muxer, Arc::clone(&store), policy.clone()),
            store,
            cache,
            worker_pool_size: settings.worker_pool_size.max(1),
            policy,
        }
    }

    /// Stages the source, extracts audio for video runs, transcribes, and
    /// parks the run at `AwaitingSubstitutionInput`.
    pub async fn start(
        &self,
        source: SourceMedia,
        params: RunParams,
    ) -> Result<PipelineRun, PipelineError> {
        let run = PipelineRun::new(source, params);
        let span = tracing::info_span!(
            "pipeline_run",
            run_id = %run.id,
            media = %run.source.kind,
        );
        self.start_inner(run).instrument(span).await
    }

    async fn start_inner(&self, mut run: PipelineRun) -> Result<PipelineRun, PipelineError> {
        let data = match tokio::fs::read(&run.source.path).await {
            Ok(data) => data,
            Err(e) => {
                return Err(PipelineError::InvalidInput(format!(
                    "cannot read source media {}: {}",
                    run.source.path.display(),
                    e
                )));
            }
        };
        run.source_content_hash = Some(content_hash(&data));

        let staged = WorkPath::new(&run.id, run.source.file_name().unwrap_or("source"));
        let byte_stream = Box::pin(stream::once(async move {
            Ok::<_, std::io::Error>(Bytes::from(data))
        }));
        if let Err(e) = self.store.store(&staged, byte_stream).await {
            return Err(PipelineError::Storage {
                source: e,
                run: fail(run),
            });
        }
        run.staged_source = Some(staged);

        if run.source.kind == MediaKind::Video {
            self.transition(&mut run, RunState::Extracting)?;
            let extracted = WorkPath::new(&run.id, "source_audio.wav");
            let output = self.store.local_path(&extracted);
            let result = call_with_retry(
                &self.policy,
                "audio extraction",
                ExtractionError::Timeout,
                || self.extractor.extract(&run.source.path, &output),
            )
            .await;
            if let Err(e) = result {
                return Err(PipelineError::Extraction {
                    source: e,
                    run: fail(run),
                });
            }
            run.extracted_audio = Some(extracted);
        }

        self.transition(&mut run, RunState::Transcribing)?;
        let audio = match run.reference_audio() {
            Some(path) => self.store.local_path(path),
            None => return Err(PipelineError::InvalidInput("run has no audio".into())),
        };
        let transcript = match call_with_retry(
            &self.policy,
            "transcription",
            TranscriptionError::Timeout,
            || self.transcriber.transcribe(&audio, &run.params.language),
        )
        .await
        {
            Ok(text) => text,
            Err(e) => {
                return Err(PipelineError::Transcription {
                    source: e,
                    run: fail(run),
                });
            }
        };

        let transcript_path = WorkPath::new(&run.id, "transcript.txt");
        if let Err(e) = self.store.put(&transcript_path, transcript.as_bytes()).await {
            return Err(PipelineError::Storage {
                source: e,
                run: fail(run),
            });
        }
        run.raw_transcript = Some(transcript);

        self.transition(&mut run, RunState::AwaitingSubstitutionInput)?;
        tracing::info!(
            run_id = %run.id,
            chars = run.raw_transcript.as_deref().map(str::len).unwrap_or(0),
            "Transcription complete, awaiting substitution input"
        );
        Ok(run)
    }

    /// Applies the caller's rules and threshold, then drives the run to a
    /// terminal state. Identical fingerprints resolve from the cache; a
    /// concurrent execution of the same fingerprint is joined, never
    /// duplicated. Per-job synthesis/assembly failures land on the job
    /// record; the returned run is `Complete` as long as at least one
    /// variant made it through, `Failed` when none did.
    pub async fn resume(
        &self,
        mut run: PipelineRun,
        rules: Vec<SubstitutionRule>,
        threshold: u8,
        cancel: &CancelFlag,
    ) -> Result<PipelineRun, PipelineError> {
        if run.state != RunState::AwaitingSubstitutionInput {
            return Err(PipelineError::InvalidInput(format!(
                "run is {}, expected {}",
                run.state,
                RunState::AwaitingSubstitutionInput
            )));
        }
        validate_threshold(threshold).map_err(PipelineError::InvalidInput)?;
        let source_hash = run
            .source_content_hash
            .clone()
            .ok_or_else(|| PipelineError::InvalidInput("run has no source hash".into()))?;

        let fingerprint = FingerprintInputs {
            source_content_hash: &source_hash,
            language: &run.params.language,
            transcription_model: &run.params.transcription_model,
            punctuation_model: &run.params.punctuation_model,
            threshold,
            rules: &rules,
        }
        .fingerprint();

        run.rules = rules;
        run.threshold = Some(threshold);
        run.fingerprint = Some(fingerprint.clone());

        match self.cache.begin(&fingerprint).await? {
            CacheBegin::Cached(cached) => {
                tracing::info!(fingerprint = %fingerprint, "Run resolved from cache");
                Ok(cached)
            }
            CacheBegin::Joined(mut rx) => {
                tracing::info!(fingerprint = %fingerprint, "Joining in-flight run");
                rx.changed().await.map_err(|_| {
                    PipelineError::Cache(CacheError::Internal(
                        "in-flight publisher dropped".into(),
                    ))
                })?;
                let published = rx.borrow().clone();
                published.ok_or(PipelineError::Cache(CacheError::InFlightFailed))
            }
            CacheBegin::Started => {
                let span = tracing::info_span!(
                    "pipeline_run",
                    run_id = %run.id,
                    fingerprint = %fingerprint,
                );
                let result = self.execute(run, cancel).instrument(span).await;
                match result {
                    Ok(run) if run.state == RunState::Complete => {
                        self.cache.publish(&fingerprint, Some(run.clone())).await?;
                        Ok(run)
                    }
                    Ok(run) => {
                        // Failed and cancelled runs are not cached so a
                        // later request may retry.
                        self.cache.publish(&fingerprint, None).await?;
                        Ok(run)
                    }
                    Err(e) => {
                        self.cache.publish(&fingerprint, None).await?;
                        Err(e)
                    }
                }
            }
        }
    }

    async fn execute(
        &self,
        mut run: PipelineRun,
        cancel: &CancelFlag,
    ) -> Result<PipelineRun, PipelineError> {
        self.transition(&mut run, RunState::GeneratingVariants)?;

        let transcript = run.raw_transcript.clone().unwrap_or_default();
        let threshold = run.threshold.unwrap_or(crate::domain::MAX_THRESHOLD);
        let variants = match self
            .generator
            .generate(&transcript, &run.rules, threshold)
            .await
        {
            Ok(variants) => variants,
            Err(e) => {
                return Err(PipelineError::VariantGeneration {
                    source: e,
                    run: fail(run),
                });
            }
        };
        run.jobs = variants.iter().map(|v| SynthesisJob::new(v.index)).collect();
        run.variants = variants;

        self.transition(&mut run, RunState::Synthesizing)?;
        self.synthesize_jobs(&mut run, cancel).await;

        if cancel.is_cancelled() {
            return self.cancel_run(run);
        }

        self.transition(&mut run, RunState::Assembling)?;
        let mut taken: HashSet<String> = HashSet::new();
        let mut order: Vec<usize> = run
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Succeeded)
            .map(|j| j.variant_index)
            .collect();
        order.sort_unstable();
        for variant_index in order {
            if cancel.is_cancelled() {
                return self.cancel_run(run);
            }
            let Some(job) = run.jobs.iter().find(|j| j.variant_index == variant_index) else {
                continue;
            };
            let outcome = self.assembler.assemble(&run, job, &mut taken).await;
            if let Some(job) = run.job_mut(variant_index) {
                match outcome {
                    Ok(artifact) => {
                        job.artifact = Some(artifact);
                    }
                    Err(e) => {
                        tracing::warn!(
                            variant_index,
                            error = %e,
                            "Assembly failed for variant"
                        );
                        job.set_status(JobStatus::Failed, Some(format!("assembly: {}", e)));
                    }
                }
            }
        }

        let succeeded = run.artifacts().len();
        let failed = run
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Failed)
            .count();
        if succeeded > 0 {
            self.transition(&mut run, RunState::Complete)?;
        } else {
            tracing::warn!(run_id = %run.id, "No variant produced an artifact");
            self.transition(&mut run, RunState::Failed)?;
        }
        tracing::info!(
            run_id = %run.id,
            state = %run.state,
            succeeded,
            failed,
            "Run finished"
        );
        Ok(run)
    }

    /// Fans synthesis jobs out onto a semaphore-bounded worker pool. Job
    /// statuses are updated through shared state as workers progress;
    /// completion order is unconstrained.
    async fn synthesize_jobs(&self, run: &mut PipelineRun, cancel: &CancelFlag) {
        let Some(reference_audio) = run.reference_audio().map(|p| self.store.local_path(p))
        else {
            for job in &mut run.jobs {
                job.set_status(JobStatus::Failed, Some("run has no reference audio".into()));
            }
            return;
        };
        let reference_text = run.raw_transcript.clone().unwrap_or_default();

        let shared = Arc::new(Mutex::new(std::mem::take(&mut run.jobs)));
        let semaphore = Arc::new(Semaphore::new(self.worker_pool_size));
        let mut workers: JoinSet<()> = JoinSet::new();

        for variant in run.variants.clone() {
            if cancel.is_cancelled() {
                set_job_status(
                    &shared,
                    variant.index,
                    JobStatus::Cancelled,
                    Some("run cancelled before scheduling".into()),
                );
                continue;
            }

            let shared = Arc::clone(&shared);
            let semaphore = Arc::clone(&semaphore);
            let cloner = Arc::clone(&self.cloner);
            let store = Arc::clone(&self.store);
            let policy = self.policy.clone();
            let cancel = cancel.clone();
            let reference_audio = reference_audio.clone();
            let reference_text = reference_text.clone();
            let run_id = run.id;

            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if cancel.is_cancelled() {
                    set_job_status(
                        &shared,
                        variant.index,
                        JobStatus::Cancelled,
                        Some("run cancelled before synthesis".into()),
                    );
                    return;
                }

                set_job_status(&shared, variant.index, JobStatus::Running, None);
                let waveform = WorkPath::new(&run_id, &format!("variant_{:03}.wav", variant.index));
                let request = SynthesisRequest {
                    reference_audio,
                    reference_text,
                    target_text: variant.text.clone(),
                    output_path: store.local_path(&waveform),
                };

                let result = call_with_retry(
                    &policy,
                    "voice synthesis",
                    SynthesisError::Timeout,
                    || cloner.synthesize(request.clone()),
                )
                .await;

                match result {
                    Ok(audio) => {
                        tracing::debug!(
                            variant_index = variant.index,
                            sample_rate = audio.sample_rate,
                            "Synthesized variant"
                        );
                        with_job(&shared, variant.index, |job| {
                            job.waveform = Some(waveform.clone());
                            job.set_status(JobStatus::Succeeded, None);
                        });
                    }
                    Err(e) => {
                        tracing::warn!(
                            variant_index = variant.index,
                            error = %e,
                            "Synthesis failed for variant"
                        );
                        set_job_status(
                            &shared,
                            variant.index,
                            JobStatus::Failed,
                            Some(e.to_string()),
                        );
                    }
                }
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Synthesis worker aborted");
            }
        }

        let mut jobs = match Arc::try_unwrap(shared) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|p| p.into_inner()),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .clone(),
        };
        // A panicked worker leaves its job mid-flight.
        for job in &mut jobs {
            if job.status == JobStatus::Running {
                job.set_status(JobStatus::Failed, Some("synthesis worker aborted".into()));
            }
        }
        run.jobs = jobs;
    }

    fn cancel_run(&self, mut run: PipelineRun) -> Result<PipelineRun, PipelineError> {
        for job in &mut run.jobs {
            if !job.is_terminal() {
                job.set_status(JobStatus::Cancelled, Some("run cancelled".into()));
            }
        }
        self.transition(&mut run, RunState::Cancelled)?;
        tracing::info!(run_id = %run.id, "Run cancelled");
        Ok(run)
    }

    fn transition(&self, run: &mut PipelineRun, next: RunState) -> Result<(), PipelineError> {
        tracing::debug!(run_id = %run.id, from = %run.state, to = %next, "Run state transition");
        run.transition_to(next)
            .map_err(|e| PipelineError::InvalidInput(e.to_string()))
    }
}

fn set_job_status(
    shared: &Arc<Mutex<Vec<SynthesisJob>>>,
    variant_index: usize,
    status: JobStatus,
    error_message: Option<String>,
) {
    with_job(shared, variant_index, |job| {
        job.set_status(status, error_message.clone());
    });
}

fn with_job(
    shared: &Arc<Mutex<Vec<SynthesisJob>>>,
    variant_index: usize,
    f: impl Fn(&mut SynthesisJob),
) {
    let mut jobs = shared.lock().unwrap_or_else(|p| p.into_inner());
    if let Some(job) = jobs.iter_mut().find(|j| j.variant_index == variant_index) {
        f(job);
    }
}

fn fail(mut run: PipelineRun) -> Box<PipelineRun> {
    let _ = run.transition_to(RunState::Failed);
    Box::new(run)
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("extraction: {source}")]
    Extraction {
        #[source]
        source: ExtractionError,
        run: Box<PipelineRun>,
    },
    #[error("transcription: {source}")]
    Transcription {
        #[source]
        source: TranscriptionError,
        run: Box<PipelineRun>,
    },
    #[error("variant generation: {source}")]
    VariantGeneration {
        #[source]
        source: VariantError,
        run: Box<PipelineRun>,
    },
    #[error("storage: {source}")]
    Storage {
        #[source]
        source: ArtifactStoreError,
        run: Box<PipelineRun>,
    },
    #[error("cache: {0}")]
    Cache(#[from] CacheError),
}
