use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::application::services::CallPolicy;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pipeline: PipelineSettings::default(),
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Concurrent synthesis jobs. 1 for a single GPU-exclusive backend;
    /// raise it only when independent backend instances exist.
    pub worker_pool_size: usize,
    /// Upper bound on the raw candidate product per run.
    pub max_variants: u64,
    /// Timeout applied to each external call (extract, transcribe, restore,
    /// synthesize, mux).
    pub call_timeout_secs: u64,
    /// Pause before the single retry after a timed-out call.
    pub retry_backoff_ms: u64,
}

impl PipelineSettings {
    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_secs(self.call_timeout_secs),
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            worker_pool_size: 1,
            max_variants: 1024,
            call_timeout_secs: 300,
            retry_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Root of the per-run working directories.
    pub base_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(".cache"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
