use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use crate::application::ports::{CacheBegin, CacheError, RunCache};
use crate::domain::{PipelineRun, RunFingerprint};

enum Entry {
    /// An execution owns this fingerprint; waiters subscribe to the sender.
    InFlight(watch::Sender<Option<PipelineRun>>),
    Ready(PipelineRun),
}

/// In-process run cache. One map guarded by one async mutex: the critical
/// sections only touch the map, so per-fingerprint work never blocks other
/// fingerprints beyond the lookup itself.
pub struct InMemoryRunCache {
    entries: Mutex<HashMap<RunFingerprint, Entry>>,
}

impl InMemoryRunCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRunCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunCache for InMemoryRunCache {
    async fn begin(&self, fingerprint: &RunFingerprint) -> Result<CacheBegin, CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(fingerprint) {
            Some(Entry::Ready(run)) => Ok(CacheBegin::Cached(run.clone())),
            Some(Entry::InFlight(tx)) => Ok(CacheBegin::Joined(tx.subscribe())),
            None => {
                let (tx, _rx) = watch::channel(None);
                entries.insert(fingerprint.clone(), Entry::InFlight(tx));
                Ok(CacheBegin::Started)
            }
        }
    }

    async fn publish(
        &self,
        fingerprint: &RunFingerprint,
        run: Option<PipelineRun>,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.remove(fingerprint) {
            Some(Entry::InFlight(tx)) => {
                // Waiters may all be gone; a send error is fine.
                let _ = tx.send(run.clone());
                if let Some(run) = run {
                    entries.insert(fingerprint.clone(), Entry::Ready(run));
                }
                Ok(())
            }
            Some(entry @ Entry::Ready(_)) => {
                entries.insert(fingerprint.clone(), entry);
                Err(CacheError::NotInFlight(fingerprint.to_string()))
            }
            None => Err(CacheError::NotInFlight(fingerprint.to_string())),
        }
    }

    async fn get(
        &self,
        fingerprint: &RunFingerprint,
    ) -> Result<Option<PipelineRun>, CacheError> {
        let entries = self.entries.lock().await;
        match entries.get(fingerprint) {
            Some(Entry::Ready(run)) => Ok(Some(run.clone())),
            _ => Ok(None),
        }
    }

    async fn evict(&self, fingerprint: &RunFingerprint) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(fingerprint) {
            Some(Entry::InFlight(_)) => Err(CacheError::Busy(fingerprint.to_string())),
            Some(Entry::Ready(_)) => {
                entries.remove(fingerprint);
                Ok(())
            }
            None => Ok(()),
        }
    }
}
