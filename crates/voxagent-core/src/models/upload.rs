use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::DEFAULT_MIME_TYPE;
use crate::error::UploadError;

/// Stable identity of an upload job. Mutations are keyed by this, never by
/// list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// A file offered for upload: name, optional reported media type and bytes.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            data: data.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Uploading => write!(f, "uploading"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "uploading" => Ok(JobStatus::Uploading),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid job status: {}", s)),
        }
    }
}

/// Upload job state. Moves only along
/// `Pending -> Uploading -> Completed | Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Uploading { progress: u8 },
    Completed { remote_id: String },
    Failed { reason: String },
}

impl JobState {
    pub fn status(&self) -> JobStatus {
        match self {
            JobState::Pending => JobStatus::Pending,
            JobState::Uploading { .. } => JobStatus::Uploading,
            JobState::Completed { .. } => JobStatus::Completed,
            JobState::Failed { .. } => JobStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }

    /// Validate a move to `next`.
    ///
    /// Progress inside `Uploading` may only grow and stays within 0..=100.
    pub fn transition(&self, next: JobState) -> Result<JobState, UploadError> {
        let legal = match (self, &next) {
            (JobState::Pending, JobState::Uploading { progress }) => *progress <= 100,
            (JobState::Uploading { progress: from }, JobState::Uploading { progress: to }) => {
                to >= from && *to <= 100
            }
            (JobState::Uploading { .. }, JobState::Completed { .. })
            | (JobState::Uploading { .. }, JobState::Failed { .. }) => true,
            _ => false,
        };

        if legal {
            Ok(next)
        } else {
            Err(UploadError::IllegalTransition {
                from: self.status(),
                to: next.status(),
            })
        }
    }
}

/// One file's upload attempt and its tracked state.
#[derive(Debug, Clone)]
pub struct UploadJob {
    id: JobId,
    name: String,
    size_bytes: u64,
    mime_type: Option<String>,
    payload: Option<Bytes>,
    storage_key: Option<String>,
    state: JobState,
}

impl UploadJob {
    pub fn new(candidate: CandidateFile) -> Self {
        Self {
            id: JobId::new(),
            size_bytes: candidate.size(),
            name: candidate.name,
            mime_type: candidate.mime_type,
            payload: Some(candidate.data),
            storage_key: None,
            state: JobState::Pending,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Media type sent at registration.
    pub fn effective_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .filter(|mime| !mime.trim().is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
    }

    /// Raw bytes; released once the job reaches a terminal state.
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref()
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn status(&self) -> JobStatus {
        self.state.status()
    }

    /// Transfer progress; a completed job reports 100, a failed one nothing.
    pub fn progress(&self) -> Option<u8> {
        match self.state {
            JobState::Uploading { progress } => Some(progress),
            JobState::Completed { .. } => Some(100),
            _ => None,
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        match &self.state {
            JobState::Completed { remote_id } => Some(remote_id),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            JobState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Single entry point for state changes.
    fn apply(&mut self, next: JobState) -> Result<(), UploadError> {
        self.state = self.state.transition(next)?;
        if self.state.is_terminal() {
            self.payload = None;
        }
        Ok(())
    }

    /// Pending -> Uploading at 0%.
    pub fn start(&mut self) -> Result<(), UploadError> {
        self.apply(JobState::Uploading { progress: 0 })
    }

    /// Record the storage key of an allocated slot. Only valid while uploading.
    pub fn assign_storage_key(&mut self, key: String) -> Result<(), UploadError> {
        if self.status() != JobStatus::Uploading {
            return Err(UploadError::IllegalTransition {
                from: self.status(),
                to: JobStatus::Uploading,
            });
        }
        self.storage_key = Some(key);
        Ok(())
    }

    /// Record transfer progress. Values below the current one are ignored;
    /// values above 100 are clamped. Returns whether the progress changed.
    pub fn record_progress(&mut self, percent: u8) -> Result<bool, UploadError> {
        let percent = percent.min(100);
        match self.state {
            JobState::Uploading { progress } if percent <= progress => Ok(false),
            JobState::Uploading { .. } => {
                self.apply(JobState::Uploading { progress: percent })?;
                Ok(true)
            }
            _ => Err(UploadError::IllegalTransition {
                from: self.status(),
                to: JobStatus::Uploading,
            }),
        }
    }

    pub fn complete(&mut self, remote_id: String) -> Result<(), UploadError> {
        self.apply(JobState::Completed { remote_id })
    }

    pub fn fail(&mut self, reason: String) -> Result<(), UploadError> {
        self.apply(JobState::Failed { reason })
    }

    pub fn view(&self) -> JobView {
        JobView {
            id: self.id,
            name: self.name.clone(),
            size: self.size_bytes,
            status: self.status(),
            progress: self.progress(),
            error: self.failure_reason().map(str::to_string),
            storage_key: self.storage_key.clone(),
            remote_id: self.remote_id().map(str::to_string),
        }
    }
}

/// Render snapshot of an upload job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: JobId,
    pub name: String,
    pub size: u64,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}
