use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{CompletedJob, FileMeta, OcrService};

/// Token returned by the upload step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(pub String);

/// Token returned by the start-processing step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Idle => 0,
            JobStatus::Uploading => 1,
            JobStatus::Processing => 2,
            JobStatus::Completed | JobStatus::Failed => 3,
        }
    }
}

/// Extracted text and the engine's confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("job cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
    #[error("job {field} already assigned")]
    AlreadyAssigned { field: &'static str },
}

/// One OCR request. Status only moves forward; `result` is set only when
/// Completed and `error` only when Failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    file: FileMeta,
    service: OcrService,
    status: JobStatus,
    file_id: Option<FileId>,
    process_id: Option<ProcessId>,
    started_at: Option<Instant>,
    elapsed: Option<Duration>,
    result: Option<OcrResult>,
    error: Option<String>,
}

impl Job {
    pub fn new(file: FileMeta, service: OcrService) -> Self {
        Self {
            file,
            service,
            status: JobStatus::Idle,
            file_id: None,
            process_id: None,
            started_at: None,
            elapsed: None,
            result: None,
            error: None,
        }
    }

    pub fn file(&self) -> &FileMeta {
        &self.file
    }

    pub fn service(&self) -> OcrService {
        self.service
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn file_id(&self) -> Option<&FileId> {
        self.file_id.as_ref()
    }

    pub fn process_id(&self) -> Option<&ProcessId> {
        self.process_id.as_ref()
    }

    pub fn result(&self) -> Option<&OcrResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Time from the start of the upload to the terminal transition.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn begin_upload(&mut self, now: Instant) -> Result<(), TransitionError> {
        self.advance(JobStatus::Uploading)?;
        self.started_at = Some(now);
        Ok(())
    }

    pub fn begin_processing(&mut self, file_id: FileId) -> Result<(), TransitionError> {
        if self.file_id.is_some() {
            return Err(TransitionError::AlreadyAssigned { field: "file_id" });
        }
        self.advance(JobStatus::Processing)?;
        self.file_id = Some(file_id);
        Ok(())
    }

    pub fn assign_process_id(&mut self, process_id: ProcessId) -> Result<(), TransitionError> {
        if self.status != JobStatus::Processing {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                to: JobStatus::Processing,
            });
        }
        if self.process_id.is_some() {
            return Err(TransitionError::AlreadyAssigned {
                field: "process_id",
            });
        }
        self.process_id = Some(process_id);
        Ok(())
    }

    pub fn complete(&mut self, result: OcrResult, now: Instant) -> Result<(), TransitionError> {
        if self.status != JobStatus::Processing {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                to: JobStatus::Completed,
            });
        }
        self.status = JobStatus::Completed;
        self.elapsed = self.started_at.map(|start| now.saturating_duration_since(start));
        self.result = Some(result);
        Ok(())
    }

    /// Any non-terminal job may fail, including an Idle one rejected by validation.
    pub fn fail(
        &mut self,
        message: impl Into<String>,
        now: Instant,
    ) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                to: JobStatus::Failed,
            });
        }
        self.status = JobStatus::Failed;
        self.elapsed = self.started_at.map(|start| now.saturating_duration_since(start));
        self.error = Some(message.into());
        Ok(())
    }

    /// Consumes a Completed job into the snapshot the history log records.
    pub fn into_completed(self) -> Option<CompletedJob> {
        match (self.status, self.result) {
            (JobStatus::Completed, Some(result)) => Some(CompletedJob {
                file: self.file,
                service: self.service,
                result,
                elapsed: self.elapsed.unwrap_or_default(),
            }),
            _ => None,
        }
    }

    fn advance(&mut self, to: JobStatus) -> Result<(), TransitionError> {
        if self.status.is_terminal() || to.rank() != self.status.rank() + 1 {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
