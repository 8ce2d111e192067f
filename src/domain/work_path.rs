use serde::{Deserialize, Serialize};

use super::RunId;

/// Run-scoped relative path inside the artifact store: `{run_id}/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkPath(String);

impl WorkPath {
    pub fn new(run_id: &RunId, filename: &str) -> Self {
        Self(format!("{}/{}", run_id.as_uuid(), filename))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn filename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for WorkPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
