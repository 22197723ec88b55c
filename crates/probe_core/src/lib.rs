//! OCR probe core: job state machine, validation, history shaping and the
//! pure UI session model.
mod effect;
mod file;
mod history;
mod job;
mod launch;
mod msg;
mod service;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use file::{format_file_size, FileMeta};
pub use history::{
    format_processing_time, text_preview, CompletedJob, HistoryEntry, HISTORY_CAPACITY,
    PREVIEW_CHARS, PREVIEW_MARKER,
};
pub use job::{FileId, Job, JobStatus, OcrResult, ProcessId, TransitionError};
pub use launch::{resolve_api_base, LaunchError, LaunchParams, LOCAL_API_BASE};
pub use msg::Msg;
pub use service::{OcrService, UnknownService};
pub use state::AppState;
pub use update::update;
pub use validate::{validate_file, ValidationError, ValidationRules, MAX_FILE_SIZE_BYTES};
pub use view_model::{
    confidence_label, AppViewModel, FileView, HistoryRowView, ResultView, NO_TEXT_PLACEHOLDER,
};
