#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use probe_core::{FileId, OcrResult, OcrService, ProcessId};
use probe_engine::{
    ApiError, ApiFailureKind, ClientEvent, Document, EventSink, OcrApi, StatusReport,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(probe_logging::initialize_for_tests);
}

pub fn network_error(message: &str) -> ApiError {
    ApiError {
        kind: ApiFailureKind::Network,
        message: message.to_string(),
    }
}

pub fn status(value: &str) -> Result<StatusReport, ApiError> {
    Ok(StatusReport {
        status: value.to_string(),
        error: None,
    })
}

pub fn failed(message: &str) -> Result<StatusReport, ApiError> {
    Ok(StatusReport {
        status: "failed".to_string(),
        error: Some(message.to_string()),
    })
}

pub fn png(bytes: usize) -> Document {
    Document::new("receipt.png", "image/png", vec![7u8; bytes])
}

#[derive(Debug, Default)]
pub struct CallCounts {
    pub upload: AtomicUsize,
    pub start: AtomicUsize,
    pub status: AtomicUsize,
    pub result: AtomicUsize,
}

impl CallCounts {
    /// (upload, start, status, result)
    pub fn snapshot(&self) -> (usize, usize, usize, usize) {
        (
            self.upload.load(Ordering::SeqCst),
            self.start.load(Ordering::SeqCst),
            self.status.load(Ordering::SeqCst),
            self.result.load(Ordering::SeqCst),
        )
    }
}

/// In-memory API that answers status queries from a script. Once the
/// script runs out every query reports `processing`.
pub struct ScriptedApi {
    statuses: Mutex<VecDeque<Result<StatusReport, ApiError>>>,
    upload_error: Option<ApiError>,
    start_error: Option<ApiError>,
    result: Result<OcrResult, ApiError>,
    pub calls: CallCounts,
    pub services: Mutex<Vec<OcrService>>,
}

impl ScriptedApi {
    pub fn new(statuses: Vec<Result<StatusReport, ApiError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            upload_error: None,
            start_error: None,
            result: Ok(OcrResult {
                text: "Total: 42.00".to_string(),
                confidence: Some(0.9),
            }),
            calls: CallCounts::default(),
            services: Mutex::new(Vec::new()),
        }
    }

    pub fn completing_after(pending: usize) -> Self {
        let mut script: Vec<_> = (0..pending).map(|_| status("processing")).collect();
        script.push(status("completed"));
        Self::new(script)
    }

    pub fn with_upload_error(mut self, err: ApiError) -> Self {
        self.upload_error = Some(err);
        self
    }

    pub fn with_start_error(mut self, err: ApiError) -> Self {
        self.start_error = Some(err);
        self
    }

    pub fn with_result(mut self, result: Result<OcrResult, ApiError>) -> Self {
        self.result = result;
        self
    }
}

#[async_trait::async_trait]
impl OcrApi for ScriptedApi {
    async fn upload(&self, _document: &Document) -> Result<FileId, ApiError> {
        self.calls.upload.fetch_add(1, Ordering::SeqCst);
        match &self.upload_error {
            Some(err) => Err(err.clone()),
            None => Ok(FileId("file-1".to_string())),
        }
    }

    async fn start_processing(
        &self,
        file_id: &FileId,
        service: OcrService,
    ) -> Result<ProcessId, ApiError> {
        assert_eq!(file_id.0, "file-1");
        self.calls.start.fetch_add(1, Ordering::SeqCst);
        self.services.lock().unwrap().push(service);
        match &self.start_error {
            Some(err) => Err(err.clone()),
            None => Ok(ProcessId("proc-1".to_string())),
        }
    }

    async fn status(&self, process_id: &ProcessId) -> Result<StatusReport, ApiError> {
        assert_eq!(process_id.0, "proc-1");
        self.calls.status.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| status("processing"))
    }

    async fn result(&self, _process_id: &ProcessId) -> Result<OcrResult, ApiError> {
        self.calls.result.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}
