//! OCR probe engine: remote API client, processing strategies, the job
//! client that drives one job through its lifecycle, and the history log.
mod api;
mod client;
mod config;
mod document;
mod history;
mod poll;
mod processor;
mod sink;
mod store;
mod types;

pub use api::{
    ApiSettings, HealthReport, HttpOcrApi, OcrApi, ServiceCatalog, ServiceInfo, StatusReport,
};
pub use client::{JobClient, TimestampFn};
pub use config::ClientConfig;
pub use document::{mime_type_for_path, Document};
pub use history::{HistoryError, HistoryLog, HistoryStore};
pub use poll::{poll_for_result, PollPolicy, PollStatus};
pub use processor::{DemoDelays, DemoProcessor, Processor, RemoteProcessor, DEMO_CONFIDENCE};
pub use sink::{ChannelEventSink, ClientEvent, EventSink};
pub use store::{FileHistoryStore, MemoryHistoryStore, HISTORY_KEY};
pub use types::{ApiError, ApiFailureKind, JobError};
