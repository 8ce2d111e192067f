use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::{RunId, WorkPath};

/// Filesystem-backed artifact store. Each run gets a directory under the
/// base path; `local_path` exposes OS paths for external tools that write
/// files directly (ffmpeg, synthesis backends).
pub struct LocalArtifactStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_path: PathBuf) -> Result<Self, ArtifactStoreError> {
        std::fs::create_dir_all(&base_path).map_err(ArtifactStoreError::Io)?;
        let base_path = base_path
            .canonicalize()
            .map_err(ArtifactStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(
        &self,
        path: &WorkPath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        let mut upload = self
            .inner
            .put_multipart(&store_path)
            .await
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(ArtifactStoreError::Io(e));
                }
            };
            total_bytes += bytes.len() as u64;
            if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
                let _ = upload.abort().await;
                return Err(ArtifactStoreError::WriteFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;

        Ok(total_bytes)
    }

    async fn put(&self, path: &WorkPath, data: &[u8]) -> Result<(), ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .put(&store_path, PutPayload::from(data.to_vec()))
            .await
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn fetch(&self, path: &WorkPath) -> Result<Vec<u8>, ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| ArtifactStoreError::NotFound(e.to_string()))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| ArtifactStoreError::ReadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &WorkPath) -> Result<(), ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| ArtifactStoreError::DeleteFailed(e.to_string()))
    }

    async fn exists(&self, path: &WorkPath) -> Result<bool, ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        match self.inner.head(&store_path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(ArtifactStoreError::ReadFailed(e.to_string())),
        }
    }

    async fn list_run(&self, run_id: &RunId) -> Result<Vec<WorkPath>, ArtifactStoreError> {
        let prefix = StorePath::from(run_id.as_uuid().to_string());
        let mut entries = self.inner.list(Some(&prefix));
        let mut paths = Vec::new();
        while let Some(meta) = entries.next().await {
            let meta = meta.map_err(|e| ArtifactStoreError::ReadFailed(e.to_string()))?;
            paths.push(WorkPath::from_raw(meta.location.to_string()));
        }
        paths.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(paths)
    }

    fn local_path(&self, path: &WorkPath) -> PathBuf {
        let mut full = self.base_path.clone();
        for part in path.as_str().split('/') {
            full.push(part);
        }
        full
    }
}
