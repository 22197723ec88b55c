use std::sync::{Arc, Mutex, PoisonError};

use probe_core::{update, AppState, AppViewModel, Effect, Msg, ValidationRules};
use probe_engine::{ClientEvent, EventSink};
use probe_logging::{probe_debug, probe_info};

use crate::render;

/// Where rendered views go.
pub trait Screen: Send + Sync {
    fn show(&self, view: &AppViewModel);
}

/// Prints the lines that changed since the previous view.
#[derive(Default)]
pub struct TerminalScreen {
    last: Mutex<AppViewModel>,
}

impl Screen for TerminalScreen {
    fn show(&self, view: &AppViewModel) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        for line in render::changes(&last, view) {
            println!("{line}");
        }
        *last = view.clone();
    }
}

/// UI session state shared between the command driver, the job client's
/// event sink and the interrupt handler.
pub struct Session {
    state: Mutex<AppState>,
    screen: Box<dyn Screen>,
}

impl Session {
    /// `rules` must be the ones the job client validates with.
    pub fn new(screen: Box<dyn Screen>, rules: ValidationRules) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(AppState::with_rules(rules)),
            screen,
        })
    }

    /// Applies `msg`, renders if anything changed and returns the effects
    /// the caller must run.
    pub fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let (view, effects) = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let state = std::mem::take(&mut *guard);
            let (mut state, effects) = update(state, msg);
            let view = state.consume_dirty().then(|| state.view());
            *guard = state;
            (view, effects)
        };

        if let Some(view) = view {
            self.screen.show(&view);
        }
        effects
    }

    pub fn view(&self) -> AppViewModel {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .view()
    }
}

/// Feeds job client events into the session as messages.
pub struct SessionSink {
    session: Arc<Session>,
}

impl SessionSink {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

impl EventSink for SessionSink {
    fn emit(&self, event: ClientEvent) {
        let Some(msg) = to_msg(event) else {
            return;
        };
        let effects = self.session.dispatch(msg);
        if !effects.is_empty() {
            probe_debug!("Ignoring {} effects raised by a client event", effects.len());
        }
    }
}

fn to_msg(event: ClientEvent) -> Option<Msg> {
    match event {
        ClientEvent::FileValidated(file) => {
            probe_debug!("{} passed validation", file.name);
            None
        }
        ClientEvent::ProcessingStarted { file, service } => {
            probe_info!("Processing {} with {}", file.name, service);
            None
        }
        ClientEvent::StatusChanged(status) => Some(Msg::JobStatusChanged(status)),
        ClientEvent::Completed { result, elapsed } => Some(Msg::JobCompleted { result, elapsed }),
        ClientEvent::Failed(message) => Some(Msg::JobFailed(message)),
        ClientEvent::HistoryUpdated(entries) => Some(Msg::HistoryUpdated(entries)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_core::{FileMeta, JobStatus, OcrResult, OcrService};
    use std::time::Duration;

    #[derive(Default, Clone)]
    struct RecordingScreen {
        views: Arc<Mutex<Vec<AppViewModel>>>,
    }

    impl Screen for RecordingScreen {
        fn show(&self, view: &AppViewModel) {
            self.views.lock().unwrap().push(view.clone());
        }
    }

    fn session() -> (Arc<Session>, RecordingScreen) {
        let screen = RecordingScreen::default();
        (
            Session::new(Box::new(screen.clone()), ValidationRules::default()),
            screen,
        )
    }

    #[test]
    fn process_click_yields_submit_effect() {
        let (session, screen) = session();
        session.dispatch(Msg::FileChosen(FileMeta::new("a.png", 10, "image/png")));
        let effects = session.dispatch(Msg::ProcessClicked);

        assert_eq!(
            effects,
            vec![Effect::SubmitJob {
                file: FileMeta::new("a.png", 10, "image/png"),
                service: OcrService::Google,
            }]
        );
        assert!(session.view().busy);
        assert_eq!(screen.views.lock().unwrap().len(), 2);
    }

    #[test]
    fn client_events_drive_the_session() {
        let (session, _screen) = session();
        session.dispatch(Msg::FileChosen(FileMeta::new("a.png", 10, "image/png")));
        session.dispatch(Msg::ProcessClicked);
        let sink = SessionSink::new(session.clone());

        sink.emit(ClientEvent::StatusChanged(JobStatus::Uploading));
        assert_eq!(session.view().status, JobStatus::Uploading);

        sink.emit(ClientEvent::Completed {
            result: OcrResult {
                text: "hello".to_string(),
                confidence: None,
            },
            elapsed: Duration::from_secs(1),
        });
        let view = session.view();
        assert!(!view.busy);
        assert_eq!(view.result.unwrap().text, "hello");
    }

    #[test]
    fn session_validates_with_the_configured_rules() {
        let rules = ValidationRules {
            allowed_mime_types: vec!["application/pdf".to_string()],
            max_size_bytes: 100,
        };
        let session = Session::new(Box::new(RecordingScreen::default()), rules);

        session.dispatch(Msg::FileChosen(FileMeta::new("a.png", 10, "image/png")));
        assert!(session.view().file.is_none());
        assert!(session.view().error.unwrap().starts_with("Invalid file type"));

        session.dispatch(Msg::FileChosen(FileMeta::new("b.pdf", 101, "application/pdf")));
        assert!(session.view().error.unwrap().starts_with("File too large"));

        session.dispatch(Msg::FileChosen(FileMeta::new("c.pdf", 100, "application/pdf")));
        assert!(session.dispatch(Msg::ProcessClicked).len() == 1);
    }

    #[test]
    fn informational_events_do_not_render() {
        let (session, screen) = session();
        SessionSink::new(session).emit(ClientEvent::FileValidated(FileMeta::new(
            "a.png",
            10,
            "image/png",
        )));
        assert!(screen.views.lock().unwrap().is_empty());
    }
}
