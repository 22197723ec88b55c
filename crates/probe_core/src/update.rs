use crate::state::Outcome;
use crate::{validate_file, AppState, Effect, Msg, OcrService};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileChosen(file) => {
            // The in-flight job owns its file until it is terminal.
            if state.is_busy() {
                return (state, Vec::new());
            }
            match validate_file(&file, state.rules()) {
                Ok(()) => state.set_file(Some(file)),
                Err(err) => state.show_error(err.to_string()),
            }
            Vec::new()
        }
        Msg::FileCleared => {
            if !state.is_busy() {
                state.set_file(None);
            }
            Vec::new()
        }
        Msg::ServiceSelected(service) => {
            if !state.is_busy() && state.service() != service {
                state.set_service(service);
            }
            Vec::new()
        }
        Msg::ProcessClicked => {
            if !state.can_submit() {
                return (state, Vec::new());
            }
            let Some(file) = state.file().cloned() else {
                return (state, Vec::new());
            };
            let service = state.service();
            state.start_job();
            vec![Effect::SubmitJob { file, service }]
        }
        Msg::CancelClicked => {
            if state.is_busy() {
                vec![Effect::CancelJob]
            } else {
                Vec::new()
            }
        }
        Msg::ClearClicked => {
            if !state.is_busy() {
                state.set_file(None);
                state.set_service(OcrService::default());
            }
            Vec::new()
        }
        Msg::JobStatusChanged(status) => {
            state.apply_status(status);
            Vec::new()
        }
        Msg::JobCompleted { result, elapsed } => {
            if state.is_busy() {
                state.finish_job(Outcome::Completed { result, elapsed });
            }
            Vec::new()
        }
        Msg::JobFailed(message) => {
            if state.is_busy() {
                state.finish_job(Outcome::Failed(message));
            }
            Vec::new()
        }
        Msg::HistoryUpdated(entries) => {
            state.set_history(entries);
            Vec::new()
        }
        Msg::HistoryEntrySelected(index) => {
            let len = state.history_len();
            if index < len {
                state.select_history(index);
            } else {
                state.show_error(format!(
                    "No history entry at position {index} (history holds {len})"
                ));
            }
            Vec::new()
        }
    };

    (state, effects)
}
