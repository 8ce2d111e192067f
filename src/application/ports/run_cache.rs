use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{PipelineRun, RunFingerprint};

/// Outcome of claiming a fingerprint for execution.
pub enum CacheBegin {
    /// A completed run is already cached; use it as-is.
    Cached(PipelineRun),
    /// Another execution of this fingerprint is in flight; await the
    /// receiver instead of starting a duplicate. `None` means that
    /// execution failed.
    Joined(watch::Receiver<Option<PipelineRun>>),
    /// The caller owns execution and must `publish` when done.
    Started,
}

/// Content-addressed run cache with single-flight execution: at most one
/// run executes per fingerprint, and entries with an execution in flight
/// cannot be evicted. Different fingerprints never contend.
#[async_trait]
pub trait RunCache: Send + Sync {
    async fn begin(&self, fingerprint: &RunFingerprint) -> Result<CacheBegin, CacheError>;

    /// Resolves the fingerprint's in-flight execution. `Some` caches the
    /// run and releases joined waiters with it; `None` records the failure,
    /// releases waiters empty-handed, and clears the entry so a later
    /// request may retry.
    async fn publish(
        &self,
        fingerprint: &RunFingerprint,
        run: Option<PipelineRun>,
    ) -> Result<(), CacheError>;

    async fn get(&self, fingerprint: &RunFingerprint)
        -> Result<Option<PipelineRun>, CacheError>;

    async fn evict(&self, fingerprint: &RunFingerprint) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("in-flight run for this fingerprint failed")]
    InFlightFailed,
    #[error("cannot evict {0}: run is in flight")]
    Busy(String),
    #[error("no in-flight entry to publish for {0}")]
    NotInFlight(String),
    #[error("cache internal error: {0}")]
    Internal(String),
}
