use std::time::Duration;

use log::info;
use tokio::time::{sleep, Instant};

use crate::error::{CheckError, ErrorCode};
use crate::models::{AuditResult, JobHandle, PollOutcome, QueueItemsResponse};

// Where poll ticks get their status payloads. The remote client
// implements this; tests drive the loop with a scripted source.
pub trait StatusSource {
    async fn fetch(&self, ids: &[String]) -> Result<QueueItemsResponse, CheckError>;
}

// Repeatedly checks the queue until every requested audit has a result,
// something unexpected comes back, or the deadline passes. The first
// check goes out immediately; every later one waits `interval` first.
pub async fn await_results<S: StatusSource>(
    source: &S,
    jobs: &[JobHandle],
    timeout: Duration,
    interval: Duration,
    verbose: bool,
) -> Result<Vec<AuditResult>, CheckError> {
    let ids: Vec<String> = jobs.iter().map(|job| job.id.clone()).collect();
    let expected = ids.len();
    let deadline = Instant::now() + timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let outcome = match source.fetch(&ids).await {
            Ok(response) => classify(response, expected),
            Err(err) => PollOutcome::Failed(err),
        };

        match outcome {
            PollOutcome::Complete(results) => {
                if verbose {
                    info!(
                        "all {} result(s) ready after {} attempt(s)",
                        expected, attempt
                    );
                }
                return Ok(results);
            }
            PollOutcome::Failed(err) => return Err(err),
            PollOutcome::Pending(partial) => {
                let received = partial.len();
                if Instant::now() > deadline {
                    let message = format!(
                        "timed out after {:?}: {}/{} audit result(s) received",
                        timeout, received, expected
                    );
                    return Err(if partial.is_empty() {
                        CheckError::new(ErrorCode::Timeout, message)
                    } else {
                        CheckError::with_data(ErrorCode::Timeout, message, partial)
                    });
                }
                if verbose {
                    info!(
                        "attempt {}: {}/{} result(s) ready, checking again in {}s",
                        attempt,
                        received,
                        expected,
                        interval.as_secs()
                    );
                }
                sleep(interval).await;
            }
        }
    }
}

// One poll tick classified. The queue reports "nothing yet" through the
// same error channel as real failures; only NO_RESULTS keeps the loop
// alive.
pub fn classify(response: QueueItemsResponse, expected: usize) -> PollOutcome {
    if response.status >= 400 {
        return match response.code.as_deref() {
            Some("NO_RESULTS") | None => PollOutcome::Pending(Vec::new()),
            Some(code) => PollOutcome::Failed(CheckError::new(
                ErrorCode::from_remote(code),
                response
                    .message
                    .unwrap_or_else(|| format!("queue returned {}", code)),
            )),
        };
    }

    let results: Vec<AuditResult> = response
        .data
        .map(|data| {
            data.lighthouse_audit
                .into_iter()
                .map(|payload| payload.into_result())
                .collect()
        })
        .unwrap_or_default();

    if results.len() == expected {
        PollOutcome::Complete(results)
    } else {
        PollOutcome::Pending(results)
    }
}
