use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::{RunId, WorkPath};

/// Per-run working directory: staged source media, extracted audio, raw
/// transcript, synthesized waveforms and final artifacts all live here.
/// External tools (ffmpeg, synthesis backends) address files by OS path,
/// so the store also resolves a `WorkPath` to a local path.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn store(
        &self,
        path: &WorkPath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, ArtifactStoreError>;

    async fn put(&self, path: &WorkPath, data: &[u8]) -> Result<(), ArtifactStoreError>;

    async fn fetch(&self, path: &WorkPath) -> Result<Vec<u8>, ArtifactStoreError>;

    async fn delete(&self, path: &WorkPath) -> Result<(), ArtifactStoreError>;

    async fn exists(&self, path: &WorkPath) -> Result<bool, ArtifactStoreError>;

    /// Files currently present under the run's directory.
    async fn list_run(&self, run_id: &RunId) -> Result<Vec<WorkPath>, ArtifactStoreError>;

    /// OS path a `WorkPath` resolves to. The file need not exist yet; this
    /// is how output paths are handed to external tools.
    fn local_path(&self, path: &WorkPath) -> PathBuf;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
