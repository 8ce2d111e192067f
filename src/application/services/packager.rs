use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::{PipelineRun, WorkPath};

/// Fixed archive filename inside each run's working directory.
pub const ARCHIVE_NAME: &str = "artifacts.tar.gz";

/// Bundles a run's succeeded artifacts into a single tar.gz for bulk
/// export. Membership is whatever has been assembled at call time, so
/// partial bundles before all jobs finish are fine.
pub struct Packager {
    store: Arc<dyn ArtifactStore>,
}

impl Packager {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub async fn bundle(&self, run: &PipelineRun) -> Result<WorkPath, PackagingError> {
        let artifacts: Vec<&WorkPath> = run.artifacts();
        if artifacts.is_empty() {
            return Err(PackagingError::NoArtifacts);
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        {
            let mut builder = tar::Builder::new(&mut encoder);
            for artifact in &artifacts {
                let bytes = self.store.fetch(artifact).await?;
                let mut header = tar::Header::new_gnu();
                header.set_size(bytes.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, artifact.filename(), bytes.as_slice())?;
            }
            builder.finish()?;
        }
        let archive = encoder.finish()?;

        let path = WorkPath::new(&run.id, ARCHIVE_NAME);
        self.store.put(&path, &archive).await?;

        tracing::info!(
            run_id = %run.id,
            members = artifacts.len(),
            bytes = archive.len(),
            "Bundled artifacts"
        );

        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("run has no assembled artifacts to bundle")]
    NoArtifacts,
    #[error("store: {0}")]
    Store(#[from] ArtifactStoreError),
    #[error("archive: {0}")]
    Archive(#[from] std::io::Error),
}
