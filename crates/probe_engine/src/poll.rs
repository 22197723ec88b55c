use std::future::Future;
use std::time::Duration;

use probe_core::{OcrResult, ProcessId};
use probe_logging::{probe_debug, probe_trace, probe_warn};
use tokio_util::sync::CancellationToken;

use crate::{JobError, OcrApi, StatusReport};

const DEFAULT_FAILURE_MESSAGE: &str = "Processing failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 120,
        }
    }
}

/// Interpretation of one status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Completed,
    Failed(String),
    Pending(String),
}

impl From<StatusReport> for PollStatus {
    fn from(report: StatusReport) -> Self {
        match report.status.as_str() {
            "completed" => PollStatus::Completed,
            "failed" => PollStatus::Failed(
                report
                    .error
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ),
            _ => PollStatus::Pending(report.status),
        }
    }
}

/// Polls `process_id` until it reaches a terminal status.
///
/// Pending statuses and failed status queries share one attempt counter and
/// wait `policy.interval` before the next query. A failed query on the final
/// attempt is returned as [`JobError::PollFailed`] instead of being retried.
/// The result fetch that follows `completed` is issued once.
pub async fn poll_for_result(
    api: &dyn OcrApi,
    process_id: &ProcessId,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<OcrResult, JobError> {
    let mut attempts = 0;
    while attempts < policy.max_attempts {
        match until_cancelled(cancel, api.status(process_id)).await? {
            Ok(report) => match PollStatus::from(report) {
                PollStatus::Completed => {
                    probe_debug!(
                        "process {} completed after {} status checks",
                        process_id,
                        attempts + 1
                    );
                    return until_cancelled(cancel, api.result(process_id))
                        .await?
                        .map_err(JobError::ResultFailed);
                }
                PollStatus::Failed(message) => {
                    return Err(JobError::ProcessingFailed(message));
                }
                PollStatus::Pending(status) => {
                    probe_trace!(
                        "process {} status={} attempt={}/{}",
                        process_id,
                        status,
                        attempts + 1,
                        policy.max_attempts
                    );
                }
            },
            Err(err) => {
                if attempts + 1 == policy.max_attempts {
                    return Err(JobError::PollFailed(err));
                }
                probe_warn!(
                    "status check {}/{} for {} failed, retrying: {}",
                    attempts + 1,
                    policy.max_attempts,
                    process_id,
                    err
                );
            }
        }

        until_cancelled(cancel, tokio::time::sleep(policy.interval)).await?;
        attempts += 1;
    }

    Err(JobError::PollTimeout { attempts })
}

/// Runs `future` unless `cancel` fires first.
pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    future: F,
) -> Result<F::Output, JobError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(JobError::Cancelled),
        output = future => Ok(output),
    }
}
