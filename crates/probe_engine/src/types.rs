use std::fmt;

use probe_core::{format_file_size, TransitionError, ValidationError};

/// Transport-level failure of one API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiFailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    InvalidResponse,
    Network,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::InvalidUrl => write!(f, "invalid url"),
            ApiFailureKind::InvalidRequest => write!(f, "invalid request"),
            ApiFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::InvalidResponse => write!(f, "invalid response"),
            ApiFailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Terminal failure of a job. Each variant renders as one message for the UI.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobError {
    #[error("Invalid file type ({mime_type}). Please upload PDF, JPG, or PNG files only.")]
    InvalidFileType { mime_type: String },
    #[error(
        "File too large ({}). Please upload files smaller than {}.",
        size_label(.size_bytes),
        size_label(.max_bytes)
    )]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
    #[error("Failed to upload file ({0})")]
    UploadFailed(ApiError),
    #[error("Failed to start processing ({0})")]
    StartFailed(ApiError),
    #[error("{0}")]
    ProcessingFailed(String),
    #[error("Processing timeout - took longer than expected ({attempts} status checks)")]
    PollTimeout { attempts: u32 },
    #[error("Failed to check processing status ({0})")]
    PollFailed(ApiError),
    #[error("Failed to fetch result ({0})")]
    ResultFailed(ApiError),
    #[error("Processing cancelled")]
    Cancelled,
    #[error("internal job state error: {0}")]
    State(#[from] TransitionError),
}

impl JobError {
    /// Validation failures never reach the network.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            JobError::InvalidFileType { .. } | JobError::FileTooLarge { .. }
        )
    }
}

impl From<ValidationError> for JobError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidFileType { mime_type } => {
                JobError::InvalidFileType { mime_type }
            }
            ValidationError::FileTooLarge {
                size_bytes,
                max_bytes,
            } => JobError::FileTooLarge {
                size_bytes,
                max_bytes,
            },
        }
    }
}

fn size_label(bytes: &u64) -> String {
    format_file_size(*bytes)
}
