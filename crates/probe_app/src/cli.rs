use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use probe_core::OcrService;

#[derive(Parser, Debug)]
#[command(
    name = "ocr-probe",
    version,
    about = "Upload documents to an OCR service and inspect the results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level for the terminal and ./probe.log
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not write ./probe.log
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one OCR job for a document and record it in the history
    Process(ProcessArgs),
    /// List, show or clear recent results
    History(HistoryArgs),
    /// List the OCR services the backend offers
    Services(ApiArgs),
    /// Check that the backend is up
    Health(ApiArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Base URL of the OCR API
    #[arg(long, env = "OCR_PROBE_API")]
    pub api: Option<String>,

    /// Launch URL; its origin and `api`/`demo` query parameters are honoured
    #[arg(long)]
    pub page_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// PDF, JPEG or PNG document
    pub file: PathBuf,

    #[arg(short, long, default_value = "google")]
    pub service: OcrService,

    /// Simulate the backend
    #[arg(long, env = "OCR_PROBE_DEMO")]
    pub demo: bool,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Print the full text of the entry at this position (0 is newest)
    #[arg(long, conflicts_with = "clear")]
    pub show: Option<usize>,

    /// Remove every entry
    #[arg(long)]
    pub clear: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Directory holding ocr_history.ron
    #[arg(long, env = "OCR_PROBE_HISTORY_DIR", default_value = ".")]
    pub history_dir: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    pub fn level_filter(&self) -> LevelFilter {
        if self.verbose && self.log_level < LogLevel::Debug {
            return LevelFilter::Debug;
        }
        match self.log_level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
