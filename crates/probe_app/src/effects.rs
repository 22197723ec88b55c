use std::sync::Arc;

use probe_core::{Effect, Job, Msg};
use probe_engine::{Document, JobClient, JobError};
use probe_logging::{probe_info, probe_warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app::Session;

/// Runs the effects `update` asks for against the job client.
pub struct EffectRunner {
    client: JobClient,
    document: Document,
    cancel: CancellationToken,
}

impl EffectRunner {
    pub fn new(client: JobClient, document: Document, cancel: CancellationToken) -> Self {
        Self {
            client,
            document,
            cancel,
        }
    }

    /// Returns the outcome of the submitted job, if one was submitted.
    pub async fn run(&mut self, effects: Vec<Effect>) -> Option<Result<Job, JobError>> {
        let mut outcome = None;
        for effect in effects {
            match effect {
                Effect::SubmitJob { file, service } => {
                    if file != self.document.meta {
                        probe_warn!("Skipping submit for {}: no document loaded for it", file.name);
                        continue;
                    }
                    outcome = Some(
                        self.client
                            .submit(&self.document, service, &self.cancel)
                            .await,
                    );
                }
                Effect::CancelJob => self.cancel.cancel(),
            }
        }
        outcome
    }
}

/// Turns Ctrl-C into a cancel click while a job is in flight.
pub fn cancel_on_interrupt(session: Arc<Session>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        probe_info!("Interrupt received");
        if session
            .dispatch(Msg::CancelClicked)
            .contains(&Effect::CancelJob)
        {
            cancel.cancel();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Screen, SessionSink};
    use probe_core::{AppViewModel, JobStatus, OcrService, ValidationRules};
    use probe_engine::{DemoProcessor, HistoryLog, MemoryHistoryStore};

    struct Blank;

    impl Screen for Blank {
        fn show(&self, _view: &AppViewModel) {}
    }

    fn runner(session: &Arc<Session>, cancel: CancellationToken) -> EffectRunner {
        let client = JobClient::new(
            Box::new(DemoProcessor::default()),
            HistoryLog::load(Box::new(MemoryHistoryStore::new())),
            Arc::new(SessionSink::new(session.clone())),
        );
        let document = Document::new("scan.png", "image/png", vec![1u8; 32]);
        EffectRunner::new(client, document, cancel)
    }

    #[tokio::test(start_paused = true)]
    async fn submit_effect_runs_the_job_and_updates_the_session() {
        let session = Session::new(Box::new(Blank), ValidationRules::default());
        let mut runner = runner(&session, CancellationToken::new());
        session.dispatch(Msg::FileChosen(runner.document.meta.clone()));
        let effects = session.dispatch(Msg::ProcessClicked);

        let outcome = runner.run(effects).await.expect("submitted");

        assert_eq!(outcome.unwrap().status(), JobStatus::Completed);
        let view = session.view();
        assert!(!view.busy);
        assert_eq!(view.status, JobStatus::Completed);
        assert_eq!(view.history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_effect_cancels_the_token() {
        let session = Session::new(Box::new(Blank), ValidationRules::default());
        let cancel = CancellationToken::new();
        let mut runner = runner(&session, cancel.clone());

        assert!(runner.run(vec![Effect::CancelJob]).await.is_none());
        assert!(cancel.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_for_unknown_file_is_skipped() {
        let session = Session::new(Box::new(Blank), ValidationRules::default());
        let mut runner = runner(&session, CancellationToken::new());
        let other = probe_core::FileMeta::new("other.png", 5, "image/png");

        let outcome = runner
            .run(vec![Effect::SubmitJob {
                file: other,
                service: OcrService::Aws,
            }])
            .await;
        assert!(outcome.is_none());
    }
}
