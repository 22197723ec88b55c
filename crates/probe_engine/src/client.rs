use std::sync::Arc;
use std::time::Instant;

use probe_core::{validate_file, Job, OcrService, ValidationRules};
use probe_logging::{probe_debug, probe_info, probe_warn};
use tokio_util::sync::CancellationToken;

use crate::{
    ApiError, ClientConfig, ClientEvent, Document, EventSink, HistoryLog, JobError, Processor,
};

/// Produces the wall-clock label stored in history entries.
pub type TimestampFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Drives one job at a time through validate -> upload -> start -> poll and
/// records successful runs in the history log.
pub struct JobClient {
    processor: Box<dyn Processor>,
    history: HistoryLog,
    sink: Arc<dyn EventSink>,
    rules: ValidationRules,
    timestamp: TimestampFn,
}

impl JobClient {
    pub fn new(
        processor: Box<dyn Processor>,
        history: HistoryLog,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            processor,
            history,
            sink,
            rules: ValidationRules::default(),
            timestamp: Arc::new(local_timestamp),
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        history: HistoryLog,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ApiError> {
        let processor = config.processor()?;
        Ok(Self::new(processor, history, sink).with_rules(config.validation.clone()))
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_timestamp(mut self, timestamp: TimestampFn) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn processor_name(&self) -> &'static str {
        self.processor.name()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Sends the current history so the UI can render it at startup.
    pub fn announce_history(&self) {
        self.sink.emit(ClientEvent::HistoryUpdated(self.history.load_all()));
    }

    /// Runs one job to a terminal state. `&mut self` keeps a single job in
    /// flight per client. On success the returned job is Completed and has
    /// been recorded in the history.
    pub async fn submit(
        &mut self,
        document: &Document,
        service: OcrService,
        cancel: &CancellationToken,
    ) -> Result<Job, JobError> {
        let mut job = Job::new(document.meta.clone(), service);

        if let Err(invalid) = validate_file(job.file(), &self.rules) {
            return Err(self.fail(&mut job, invalid.into()));
        }
        self.sink.emit(ClientEvent::FileValidated(job.file().clone()));

        if let Err(err) = self.drive(&mut job, document, cancel).await {
            return Err(self.fail(&mut job, err));
        }

        let result = job.result().cloned().unwrap_or_default();
        let elapsed = job.elapsed().unwrap_or_default();
        probe_info!(
            "Job for {} completed in {:.2}s ({} chars)",
            job.file().name,
            elapsed.as_secs_f64(),
            result.text.chars().count()
        );
        self.sink.emit(ClientEvent::Completed { result, elapsed });

        if let Some(completed) = job.clone().into_completed() {
            let timestamp = (self.timestamp)();
            let entries = self.history.record(&completed, timestamp).to_vec();
            self.sink.emit(ClientEvent::HistoryUpdated(entries));
        }
        Ok(job)
    }

    async fn drive(
        &self,
        job: &mut Job,
        document: &Document,
        cancel: &CancellationToken,
    ) -> Result<(), JobError> {
        self.sink.emit(ClientEvent::ProcessingStarted {
            file: job.file().clone(),
            service: job.service(),
        });
        job.begin_upload(now())?;
        self.emit_status(job);

        let file_id = self.processor.upload(document, cancel).await?;
        probe_debug!("Uploaded {} as {}", job.file().name, file_id);
        job.begin_processing(file_id.clone())?;
        self.emit_status(job);

        let process_id = self
            .processor
            .start_processing(&file_id, job.service(), cancel)
            .await?;
        probe_debug!("Started process {} with {}", process_id, job.service());
        job.assign_process_id(process_id.clone())?;

        let result = self.processor.poll(&process_id, job.file(), cancel).await?;
        job.complete(result, now())?;
        self.emit_status(job);
        Ok(())
    }

    fn fail(&self, job: &mut Job, err: JobError) -> JobError {
        let message = err.to_string();
        if let Err(state) = job.fail(message.clone(), now()) {
            probe_warn!("Job for {} already terminal: {}", job.file().name, state);
        }
        probe_warn!("Job for {} failed: {}", job.file().name, message);
        self.emit_status(job);
        self.sink.emit(ClientEvent::Failed(message));
        err
    }

    fn emit_status(&self, job: &Job) {
        self.sink.emit(ClientEvent::StatusChanged(job.status()));
    }
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

fn local_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
