//! Polling of remote ingestion jobs.
//!
//! The loop sleeps a fixed interval, fetches the job status and stops at the
//! first terminal status. There is no backoff; a ceiling on the number of
//! polls is available but off by default.

use super::IngestionService;
use crate::progress::ProgressReporter;
use crate::types::IngestionJob;
use policyguide_core::config::DEFAULT_POLL_INTERVAL_SECS;
use policyguide_core::{AppError, AppResult};
use std::time::Duration;

/// How to wait for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Sleep before each status fetch
    pub interval: Duration,

    /// Give up after this many polls
    pub max_polls: Option<u64>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_polls: None,
        }
    }
}

impl PollOptions {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: Option<u64>) -> Self {
        self.max_polls = max_polls;
        self
    }
}

/// Poll a job until it reaches `Complete` or `Failed`.
///
/// Returns the terminal snapshot; a failed job is returned, not raised.
/// A status fetch error stops polling and is propagated.
pub async fn wait_for_completion(
    service: &dyn IngestionService,
    job_id: &str,
    options: &PollOptions,
    progress: &ProgressReporter,
) -> AppResult<IngestionJob> {
    let mut polls = 0u64;

    loop {
        if let Some(max_polls) = options.max_polls {
            if polls >= max_polls {
                return Err(AppError::Ingestion(format!(
                    "Ingestion job {} did not finish after {} polls",
                    job_id, polls
                )));
            }
        }

        tokio::time::sleep(options.interval).await;

        let job = service.job_status(job_id).await?;
        polls += 1;

        tracing::info!(job_id, poll = polls, status = %job.status, "Polled ingestion job");
        progress.ingest(polls, job_id, job.status);

        if job.status.is_terminal() {
            if !job.failure_reasons.is_empty() {
                tracing::warn!(job_id, "Ingestion failures: {}", job.failure_reasons.join("; "));
            }
            return Ok(job);
        }
    }
}

/// Start a job and wait for it to finish.
pub async fn run_ingestion(
    service: &dyn IngestionService,
    description: Option<&str>,
    options: &PollOptions,
    progress: &ProgressReporter,
) -> AppResult<IngestionJob> {
    let job = service.start_job(description).await?;
    tracing::info!(
        job_id = %job.job_id,
        service = service.name(),
        status = %job.status,
        "Ingestion job started"
    );

    if job.status.is_terminal() {
        return Ok(job);
    }

    wait_for_completion(service, &job.job_id, options, progress).await
}
