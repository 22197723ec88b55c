use std::sync::mpsc;
use std::time::Duration;

use probe_core::{FileMeta, HistoryEntry, JobStatus, OcrResult, OcrService};

/// Notifications for the UI layer. The UI renders these without further logic.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    FileValidated(FileMeta),
    ProcessingStarted {
        file: FileMeta,
        service: OcrService,
    },
    StatusChanged(JobStatus),
    Completed {
        result: OcrResult,
        elapsed: Duration,
    },
    Failed(String),
    HistoryUpdated(Vec<HistoryEntry>),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}
