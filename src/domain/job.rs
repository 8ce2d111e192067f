use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SynthesisJobId, WorkPath};

/// One synthesis unit, created per distinct variant transcript. Owned by the
/// orchestrator until it reaches a terminal status; failures are recorded
/// here rather than raised at the run level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisJob {
    pub id: SynthesisJobId,
    pub variant_index: usize,
    pub status: JobStatus,
    pub error_message: Option<String>,
    /// Synthesized waveform, present once synthesis succeeds.
    pub waveform: Option<WorkPath>,
    /// Final artifact, present once assembly succeeds.
    pub artifact: Option<WorkPath>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SynthesisJob {
    pub fn new(variant_index: usize) -> Self {
        let now = Utc::now();
        Self {
            id: SynthesisJobId::new(),
            variant_index,
            status: JobStatus::Pending,
            error_message: None,
            waveform: None,
            artifact: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: JobStatus, error_message: Option<String>) {
        self.status = status;
        self.error_message = error_message;
        self.updated_at = Utc::now();
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCEEDED" => Ok(JobStatus::Succeeded),
            "FAILED" => Ok(JobStatus::Failed),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
