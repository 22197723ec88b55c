mod app;
mod cli;
mod commands;
mod effects;
mod render;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use probe_logging::{probe_error, LogDestination};

use cli::{Cli, Command};

const LOG_FILE: &str = "./probe.log";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let outcome = match cli.command {
        Command::Process(args) => commands::process(args).await,
        Command::History(args) => commands::history(args),
        Command::Services(args) => commands::services(args).await,
        Command::Health(args) => commands::health(args).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            probe_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let destination = if cli.no_log_file {
        LogDestination::Terminal
    } else {
        LogDestination::Both(Path::new(LOG_FILE))
    };
    probe_logging::initialize(destination, cli.level_filter());
}
