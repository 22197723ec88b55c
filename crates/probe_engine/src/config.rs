use std::path::PathBuf;
use std::sync::Arc;

use probe_core::ValidationRules;
use probe_logging::probe_info;
use url::Url;

use crate::{
    ApiError, ApiSettings, DemoDelays, DemoProcessor, FileHistoryStore, HistoryLog, HttpOcrApi,
    PollPolicy, Processor, RemoteProcessor,
};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: Url,
    pub api: ApiSettings,
    pub poll: PollPolicy,
    pub validation: ValidationRules,
    /// Replace the network steps with [`DemoProcessor`].
    pub demo: bool,
    pub demo_delays: DemoDelays,
    /// Directory holding `ocr_history.ron`.
    pub history_dir: PathBuf,
}

impl ClientConfig {
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            api: ApiSettings::default(),
            poll: PollPolicy::default(),
            validation: ValidationRules::default(),
            demo: false,
            demo_delays: DemoDelays::default(),
            history_dir: PathBuf::from("."),
        }
    }

    /// Picks the processing strategy once, at construction time.
    pub fn processor(&self) -> Result<Box<dyn Processor>, ApiError> {
        if self.demo {
            probe_info!("Running in demo mode - no backend required");
            return Ok(Box::new(DemoProcessor::new(self.demo_delays)));
        }
        let api = HttpOcrApi::new(self.api_base.clone(), &self.api)?;
        probe_info!("Using OCR API at {}", self.api_base);
        Ok(Box::new(RemoteProcessor::new(Arc::new(api), self.poll)))
    }

    pub fn history_store(&self) -> FileHistoryStore {
        FileHistoryStore::new(&self.history_dir)
    }

    pub fn load_history(&self) -> HistoryLog {
        HistoryLog::load(Box::new(self.history_store()))
    }
}
