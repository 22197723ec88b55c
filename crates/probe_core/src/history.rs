use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{FileMeta, OcrResult, OcrService};

/// Maximum number of history entries kept, newest first.
pub const HISTORY_CAPACITY: usize = 5;
/// Characters of extracted text shown in a history preview.
pub const PREVIEW_CHARS: usize = 100;
pub const PREVIEW_MARKER: &str = "...";

/// A finished job, ready to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedJob {
    pub file: FileMeta,
    pub service: OcrService,
    pub result: OcrResult,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub file_name: String,
    pub file_size: String,
    pub service: OcrService,
    pub timestamp: String,
    pub processing_time: String,
    pub text_preview: String,
    pub full_text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl HistoryEntry {
    /// `timestamp` is the caller's wall clock, already formatted.
    pub fn from_completed(job: &CompletedJob, timestamp: impl Into<String>) -> Self {
        Self {
            file_name: job.file.name.clone(),
            file_size: job.file.size_label(),
            service: job.service,
            timestamp: timestamp.into(),
            processing_time: format_processing_time(job.elapsed),
            text_preview: text_preview(&job.result.text),
            full_text: job.result.text.clone(),
            confidence: job.result.confidence,
        }
    }
}

/// First [`PREVIEW_CHARS`] characters followed by [`PREVIEW_MARKER`].
pub fn text_preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str(PREVIEW_MARKER);
    preview
}

/// Seconds with two decimals: `3.42s`.
pub fn format_processing_time(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_first_hundred_chars() {
        let text: String = ('a'..='z').cycle().take(250).collect();
        let preview = text_preview(&text);
        assert_eq!(preview, format!("{}...", &text[..100]));
        assert_eq!(preview.len(), PREVIEW_CHARS + PREVIEW_MARKER.len());
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        let text = "é".repeat(150);
        let preview = text_preview(&text);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn short_text_still_gets_marker() {
        assert_eq!(text_preview("hi"), "hi...");
        assert_eq!(text_preview(""), "...");
    }

    #[test]
    fn processing_time_has_two_decimals() {
        assert_eq!(format_processing_time(Duration::from_millis(3420)), "3.42s");
        assert_eq!(format_processing_time(Duration::ZERO), "0.00s");
    }
}
