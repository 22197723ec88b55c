use std::sync::Arc;
use std::time::Duration;

use probe_core::{FileId, FileMeta, OcrResult, OcrService, ProcessId};
use probe_logging::probe_info;
use tokio_util::sync::CancellationToken;

use crate::poll::until_cancelled;
use crate::{poll_for_result, Document, JobError, OcrApi, PollPolicy};

/// Confidence reported by every simulated run.
pub const DEMO_CONFIDENCE: f64 = 0.95;

/// The three network steps of a job. Implementations are chosen when the
/// job client is built; the client never switches strategy at runtime.
#[async_trait::async_trait]
pub trait Processor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn upload(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> Result<FileId, JobError>;

    async fn start_processing(
        &self,
        file_id: &FileId,
        service: OcrService,
        cancel: &CancellationToken,
    ) -> Result<ProcessId, JobError>;

    /// Waits for `process_id` to finish. `file` is the document being processed.
    async fn poll(
        &self,
        process_id: &ProcessId,
        file: &FileMeta,
        cancel: &CancellationToken,
    ) -> Result<OcrResult, JobError>;
}

/// Talks to the remote OCR API.
pub struct RemoteProcessor {
    api: Arc<dyn OcrApi>,
    policy: PollPolicy,
}

impl RemoteProcessor {
    pub fn new(api: Arc<dyn OcrApi>, policy: PollPolicy) -> Self {
        Self { api, policy }
    }
}

#[async_trait::async_trait]
impl Processor for RemoteProcessor {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn upload(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> Result<FileId, JobError> {
        until_cancelled(cancel, self.api.upload(document))
            .await?
            .map_err(JobError::UploadFailed)
    }

    async fn start_processing(
        &self,
        file_id: &FileId,
        service: OcrService,
        cancel: &CancellationToken,
    ) -> Result<ProcessId, JobError> {
        until_cancelled(cancel, self.api.start_processing(file_id, service))
            .await?
            .map_err(JobError::StartFailed)
    }

    async fn poll(
        &self,
        process_id: &ProcessId,
        _file: &FileMeta,
        cancel: &CancellationToken,
    ) -> Result<OcrResult, JobError> {
        poll_for_result(self.api.as_ref(), process_id, &self.policy, cancel).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDelays {
    pub upload: Duration,
    pub start: Duration,
    pub poll: Duration,
}

impl Default for DemoDelays {
    fn default() -> Self {
        Self {
            upload: Duration::from_millis(500),
            start: Duration::from_millis(300),
            poll: Duration::from_millis(2000),
        }
    }
}

/// Simulated backend for exercising the UI without a server.
#[derive(Debug, Clone, Default)]
pub struct DemoProcessor {
    delays: DemoDelays,
}

impl DemoProcessor {
    pub fn new(delays: DemoDelays) -> Self {
        Self { delays }
    }

    fn canned_text(file_name: &str) -> String {
        format!(
            "Demo extracted text from {file_name}:\n\n\
             This is sample text that would be extracted from your document. \
             A live backend returns the text found by the selected OCR service.\n\n\
             The document processing was successful and this text stands in for \
             what would be found in your uploaded file."
        )
    }
}

#[async_trait::async_trait]
impl Processor for DemoProcessor {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn upload(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> Result<FileId, JobError> {
        probe_info!("demo upload of {}", document.meta.name);
        until_cancelled(cancel, tokio::time::sleep(self.delays.upload)).await?;
        Ok(FileId("demo-file-123".to_string()))
    }

    async fn start_processing(
        &self,
        _file_id: &FileId,
        _service: OcrService,
        cancel: &CancellationToken,
    ) -> Result<ProcessId, JobError> {
        until_cancelled(cancel, tokio::time::sleep(self.delays.start)).await?;
        Ok(ProcessId("demo-process-456".to_string()))
    }

    async fn poll(
        &self,
        _process_id: &ProcessId,
        file: &FileMeta,
        cancel: &CancellationToken,
    ) -> Result<OcrResult, JobError> {
        until_cancelled(cancel, tokio::time::sleep(self.delays.poll)).await?;
        Ok(OcrResult {
            text: Self::canned_text(&file.name),
            confidence: Some(DEMO_CONFIDENCE),
        })
    }
}
