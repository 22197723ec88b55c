mod support;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use probe_core::{OcrResult, ProcessId};
use probe_engine::{poll_for_result, ApiFailureKind, JobError, PollPolicy};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use support::{failed, init_logging, network_error, status, ScriptedApi};

fn process() -> ProcessId {
    ProcessId("proc-1".to_string())
}

#[tokio::test(start_paused = true)]
async fn pending_statuses_wait_one_interval_each() {
    init_logging();
    let api = ScriptedApi::completing_after(3);
    let started = Instant::now();

    let result = poll_for_result(
        &api,
        &process(),
        &PollPolicy::default(),
        &CancellationToken::new(),
    )
    .await
    .expect("completed");

    assert_eq!(result.text, "Total: 42.00");
    assert_eq!(api.calls.snapshot(), (0, 0, 4, 1));
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn never_terminal_times_out_after_max_attempts() {
    init_logging();
    let api = ScriptedApi::new(Vec::new());

    let err = poll_for_result(
        &api,
        &process(),
        &PollPolicy::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err, JobError::PollTimeout { attempts: 120 });
    assert_eq!(api.calls.snapshot(), (0, 0, 120, 0));
    assert!(err.to_string().starts_with("Processing timeout"));
}

#[tokio::test(start_paused = true)]
async fn failed_status_is_terminal_and_skips_result() {
    init_logging();
    let api = ScriptedApi::new(vec![status("processing"), failed("bad scan")]);

    let err = poll_for_result(
        &api,
        &process(),
        &PollPolicy::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err, JobError::ProcessingFailed("bad scan".to_string()));
    assert_eq!(err.to_string(), "bad scan");
    assert_eq!(api.calls.snapshot(), (0, 0, 2, 0));
}

#[tokio::test(start_paused = true)]
async fn transient_status_errors_are_retried() {
    init_logging();
    let api = ScriptedApi::new(vec![
        Err(network_error("connection reset")),
        status("processing"),
        Err(network_error("connection reset")),
        status("completed"),
    ]);

    let result = poll_for_result(
        &api,
        &process(),
        &PollPolicy::default(),
        &CancellationToken::new(),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(api.calls.snapshot(), (0, 0, 4, 1));
}

#[tokio::test(start_paused = true)]
async fn status_error_on_final_attempt_is_reported() {
    init_logging();
    let api = ScriptedApi::new(vec![
        status("processing"),
        status("processing"),
        Err(network_error("connection refused")),
    ]);
    let policy = PollPolicy {
        interval: Duration::from_secs(1),
        max_attempts: 3,
    };

    let err = poll_for_result(&api, &process(), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        JobError::PollFailed(api_err) => {
            assert_eq!(api_err.kind, ApiFailureKind::Network);
            assert_eq!(api_err.message, "connection refused");
        }
        other => panic!("expected PollFailed, got {other:?}"),
    }
    assert_eq!(api.calls.snapshot(), (0, 0, 3, 0));
}

#[tokio::test(start_paused = true)]
async fn result_fetch_is_not_retried() {
    init_logging();
    let api = ScriptedApi::completing_after(0).with_result(Err(network_error("gone")));

    let err = poll_for_result(
        &api,
        &process(),
        &PollPolicy::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, JobError::ResultFailed(_)));
    assert_eq!(api.calls.snapshot(), (0, 0, 1, 1));
}

#[tokio::test(start_paused = true)]
async fn missing_result_fields_default() {
    init_logging();
    let api = ScriptedApi::completing_after(0).with_result(Ok(OcrResult::default()));

    let result = poll_for_result(
        &api,
        &process(),
        &PollPolicy::default(),
        &CancellationToken::new(),
    )
    .await
    .expect("completed");

    assert_eq!(result, OcrResult::default());
}

#[tokio::test(start_paused = true)]
async fn cancelled_token_stops_before_first_query() {
    init_logging();
    let api = ScriptedApi::completing_after(0);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = poll_for_result(&api, &process(), &PollPolicy::default(), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, JobError::Cancelled);
    assert_eq!(api.calls.snapshot(), (0, 0, 0, 0));
}

#[tokio::test(start_paused = true)]
async fn cancel_during_wait_ends_polling() {
    init_logging();
    let api = Arc::new(ScriptedApi::new(Vec::new()));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(4500)).await;
        trigger.cancel();
    });

    let err = poll_for_result(api.as_ref(), &process(), &PollPolicy::default(), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, JobError::Cancelled);
    assert_eq!(api.calls.snapshot().2, 5);
}
