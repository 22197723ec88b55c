use std::time::Duration;

use crate::{format_processing_time, FileMeta, HistoryEntry, JobStatus, OcrResult, OcrService};

/// Shown in place of an empty extraction.
pub const NO_TEXT_PLACEHOLDER: &str = "No text extracted";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub file: Option<FileView>,
    pub service: OcrService,
    pub can_submit: bool,
    pub busy: bool,
    pub status: JobStatus,
    pub result: Option<ResultView>,
    pub error: Option<String>,
    pub history: Vec<HistoryRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub name: String,
    pub size_label: String,
    pub mime_type: String,
}

impl FileView {
    pub(crate) fn from_meta(meta: &FileMeta) -> Self {
        Self {
            name: meta.name.clone(),
            size_label: meta.size_label(),
            mime_type: meta.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub processing_time: String,
    pub confidence: String,
    pub text: String,
}

impl ResultView {
    pub(crate) fn from_result(result: &OcrResult, elapsed: Duration) -> Self {
        Self {
            processing_time: format!("Processing time: {}", format_processing_time(elapsed)),
            confidence: confidence_label(result.confidence),
            text: display_text(&result.text),
        }
    }

    pub(crate) fn from_history(entry: &HistoryEntry) -> Self {
        Self {
            processing_time: format!("Processing time: {}", entry.processing_time),
            confidence: confidence_label(entry.confidence),
            text: entry.full_text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub index: usize,
    pub file_name: String,
    pub meta: String,
    pub preview: String,
}

impl HistoryRowView {
    pub(crate) fn from_entry(index: usize, entry: &HistoryEntry) -> Self {
        let mut meta = format!(
            "{} • {} • {}",
            entry.timestamp, entry.service, entry.processing_time
        );
        if let Some(percent) = confidence_percent(entry.confidence) {
            meta.push_str(&format!(" • {percent:.1}%"));
        }
        Self {
            index,
            file_name: entry.file_name.clone(),
            meta,
            preview: entry.text_preview.clone(),
        }
    }
}

/// `Confidence: 95.0%`, or empty when the engine reported none (or zero).
pub fn confidence_label(confidence: Option<f64>) -> String {
    confidence_percent(confidence)
        .map(|percent| format!("Confidence: {percent:.1}%"))
        .unwrap_or_default()
}

fn confidence_percent(confidence: Option<f64>) -> Option<f64> {
    confidence
        .filter(|value| *value != 0.0 && !value.is_nan())
        .map(|value| value * 100.0)
}

fn display_text(text: &str) -> String {
    if text.is_empty() {
        NO_TEXT_PLACEHOLDER.to_string()
    } else {
        text.to_string()
    }
}
