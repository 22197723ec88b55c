use std::time::Duration;

use crate::view_model::{AppViewModel, FileView, HistoryRowView, ResultView};
use crate::{FileMeta, HistoryEntry, JobStatus, OcrResult, OcrService, ValidationRules};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Completed { result: OcrResult, elapsed: Duration },
    Failed(String),
}

/// UI session model: the selected file and service, whether a job is in
/// flight, the last outcome and the history panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    rules: ValidationRules,
    file: Option<FileMeta>,
    service: OcrService,
    busy: bool,
    job_status: JobStatus,
    outcome: Option<Outcome>,
    history: Vec<HistoryEntry>,
    selected_history: Option<usize>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: ValidationRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let detail = self
            .selected_history
            .and_then(|index| self.history.get(index))
            .map(ResultView::from_history);
        let completed = match &self.outcome {
            Some(Outcome::Completed { result, elapsed }) => {
                Some(ResultView::from_result(result, *elapsed))
            }
            _ => None,
        };
        let error = match &self.outcome {
            Some(Outcome::Failed(message)) => Some(message.clone()),
            _ => None,
        };

        AppViewModel {
            file: self.file.as_ref().map(FileView::from_meta),
            service: self.service,
            can_submit: self.can_submit(),
            busy: self.busy,
            status: self.job_status,
            result: detail.or(completed),
            error,
            history: self
                .history
                .iter()
                .enumerate()
                .map(|(index, entry)| HistoryRowView::from_entry(index, entry))
                .collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn service(&self) -> OcrService {
        self.service
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn can_submit(&self) -> bool {
        self.file.is_some() && !self.busy
    }

    pub(crate) fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub(crate) fn file(&self) -> Option<&FileMeta> {
        self.file.as_ref()
    }

    pub(crate) fn set_file(&mut self, file: Option<FileMeta>) {
        self.file = file;
        self.outcome = None;
        self.selected_history = None;
        self.mark_dirty();
    }

    pub(crate) fn set_service(&mut self, service: OcrService) {
        self.service = service;
        self.mark_dirty();
    }

    pub(crate) fn start_job(&mut self) {
        self.busy = true;
        self.job_status = JobStatus::Idle;
        self.outcome = None;
        self.selected_history = None;
        self.mark_dirty();
    }

    pub(crate) fn apply_status(&mut self, status: JobStatus) {
        if self.busy && self.job_status != status {
            self.job_status = status;
            self.mark_dirty();
        }
    }

    pub(crate) fn finish_job(&mut self, outcome: Outcome) {
        self.busy = false;
        self.job_status = match outcome {
            Outcome::Completed { .. } => JobStatus::Completed,
            Outcome::Failed(_) => JobStatus::Failed,
        };
        self.outcome = Some(outcome);
        self.mark_dirty();
    }

    pub(crate) fn show_error(&mut self, message: String) {
        self.outcome = Some(Outcome::Failed(message));
        self.selected_history = None;
        self.mark_dirty();
    }

    pub(crate) fn set_history(&mut self, history: Vec<HistoryEntry>) {
        if self
            .selected_history
            .is_some_and(|index| index >= history.len())
        {
            self.selected_history = None;
        }
        self.history = history;
        self.mark_dirty();
    }

    pub(crate) fn select_history(&mut self, index: usize) {
        self.selected_history = Some(index);
        self.outcome = None;
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
