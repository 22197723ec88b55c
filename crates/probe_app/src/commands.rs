use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use probe_core::{resolve_api_base, update, AppState, LaunchParams, Msg, OcrService};
use probe_engine::{
    ApiSettings, ClientConfig, Document, FileHistoryStore, HistoryLog, HttpOcrApi, JobClient,
};
use probe_logging::{probe_debug, probe_info};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::app::{Session, SessionSink, TerminalScreen};
use crate::cli::{ApiArgs, HistoryArgs, ProcessArgs};
use crate::effects::{cancel_on_interrupt, EffectRunner};
use crate::render;

/// Backend location and mode after merging flags, env and the launch URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub api_base: Url,
    pub demo: bool,
}

pub fn resolve_launch(args: &ApiArgs) -> Result<Launch> {
    let page = args
        .page_url
        .as_deref()
        .map(Url::parse)
        .transpose()
        .context("invalid --page-url")?;
    let params = page
        .as_ref()
        .map(LaunchParams::from_page_url)
        .unwrap_or_default();
    let api = args.api.clone().or(params.api);
    let api_base = resolve_api_base(api.as_deref(), page.as_ref())?;
    Ok(Launch {
        api_base,
        demo: params.demo,
    })
}

pub async fn process(args: ProcessArgs) -> Result<()> {
    let launch = resolve_launch(&args.api)?;
    let mut config = ClientConfig::new(launch.api_base);
    config.demo = args.demo || launch.demo;
    config.history_dir = args.store.history_dir.clone();

    let document = Document::from_path(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let session = Session::new(
        Box::new(TerminalScreen::default()),
        config.validation.clone(),
    );
    let sink = Arc::new(SessionSink::new(session.clone()));
    let client = JobClient::from_config(&config, config.load_history(), sink)?;
    probe_info!(
        "Processing {} via {} processor",
        args.file.display(),
        client.processor_name()
    );
    client.announce_history();

    session.dispatch(Msg::ServiceSelected(args.service));
    session.dispatch(Msg::FileChosen(document.meta.clone()));
    let effects = session.dispatch(Msg::ProcessClicked);
    if effects.is_empty() {
        let reason = session
            .view()
            .error
            .unwrap_or_else(|| "nothing to submit".to_string());
        bail!("{} was not submitted: {reason}", document.meta.name);
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_interrupt(session, cancel.clone());
    let mut runner = EffectRunner::new(client, document, cancel);
    let outcome = runner.run(effects).await;
    interrupt.abort();

    match outcome {
        Some(Ok(job)) => {
            probe_debug!("Job finished with status {:?}", job.status());
            Ok(())
        }
        Some(Err(err)) => Err(err.into()),
        None => Err(anyhow!("no job was submitted")),
    }
}

pub fn history(args: HistoryArgs) -> Result<()> {
    let mut log = HistoryLog::load(Box::new(FileHistoryStore::new(&args.store.history_dir)));

    if args.clear {
        log.clear();
        println!("History cleared");
        return Ok(());
    }

    let (state, _) = update(AppState::new(), Msg::HistoryUpdated(log.load_all()));
    let Some(index) = args.show else {
        for line in render::history_lines(&state.view().history) {
            println!("{line}");
        }
        return Ok(());
    };

    let entry = log.get(index)?;
    println!(
        "{} ({}) • {} • {}",
        entry.file_name, entry.file_size, entry.service, entry.timestamp
    );
    let (state, _) = update(state, Msg::HistoryEntrySelected(index));
    if let Some(result) = state.view().result {
        for line in render::result_lines(&result) {
            println!("{line}");
        }
    }
    Ok(())
}

pub async fn services(args: ApiArgs) -> Result<()> {
    let launch = resolve_launch(&args)?;
    if launch.demo {
        println!("Demo mode: all services are simulated");
        for service in OcrService::ALL {
            println!("  {:<10} {}", service.as_str(), service.label());
        }
        return Ok(());
    }
    let api = HttpOcrApi::new(launch.api_base, &ApiSettings::default())?;
    let catalog = api
        .services()
        .await
        .with_context(|| format!("failed to list services at {}", api.base()))?;
    for line in render::service_lines(&catalog) {
        println!("{line}");
    }
    Ok(())
}

pub async fn health(args: ApiArgs) -> Result<()> {
    let launch = resolve_launch(&args)?;
    if launch.demo {
        println!("Demo mode: no backend in use");
        return Ok(());
    }
    let api = HttpOcrApi::new(launch.api_base, &ApiSettings::default())?;
    let report = api
        .health()
        .await
        .with_context(|| format!("backend at {} is unreachable", api.base()))?;
    for line in render::health_lines(&report) {
        println!("{line}");
    }
    Ok(())
}
