use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a document (drag/drop or file dialog).
    FileChosen(crate::FileMeta),
    /// User removed the selected document.
    FileCleared,
    /// User changed the OCR service selector.
    ServiceSelected(crate::OcrService),
    /// User clicked Process.
    ProcessClicked,
    /// User asked to abandon the in-flight job.
    CancelClicked,
    /// User clicked Clear: drop the file and reset the service selector.
    ClearClicked,
    /// Job client moved the in-flight job to a new status.
    JobStatusChanged(crate::JobStatus),
    /// Job client finished the in-flight job successfully.
    JobCompleted {
        result: crate::OcrResult,
        elapsed: Duration,
    },
    /// Job client gave up on the in-flight job.
    JobFailed(String),
    /// History log loaded or changed; carries the full newest-first sequence.
    HistoryUpdated(Vec<crate::HistoryEntry>),
    /// User clicked View on a history row.
    HistoryEntrySelected(usize),
}
