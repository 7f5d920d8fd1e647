//! Ingest command handler.
//!
//! Uploads local policy PDFs to `policy_docs/` and syncs the knowledge base.

use super::print_json;
use clap::{Args, Subcommand};
use policyguide_core::{config::AppConfig, AppError, AppResult};
use policyguide_knowledge::ingest::{run_ingestion, upload_policy_documents};
use policyguide_knowledge::{
    Backends, IngestionJob, IngestionStatus, PollOptions, ProgressEvent, ProgressReporter,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Description attached to knowledge base sync jobs.
const SYNC_DESCRIPTION: &str = "Policy documents sync";

/// Upload policy documents and sync the knowledge base
#[derive(Args, Debug)]
pub struct IngestCommand {
    #[command(subcommand)]
    pub action: IngestAction,
}

#[derive(Subcommand, Debug)]
pub enum IngestAction {
    /// Upload documents and start an ingestion job
    Start(IngestStartCommand),
    /// Show the status of an ingestion job
    Status(IngestStatusCommand),
}

/// Upload documents and start an ingestion job
#[derive(Args, Debug)]
pub struct IngestStartCommand {
    /// Directory of policy PDFs (default: configured documents path)
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Start the job without uploading documents first
    #[arg(long)]
    pub skip_upload: bool,

    /// Return after starting the job instead of waiting for it
    #[arg(long)]
    pub no_wait: bool,

    /// Seconds between status polls
    #[arg(long)]
    pub interval: Option<u64>,

    /// Give up after this many polls
    #[arg(long)]
    pub max_polls: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestStartCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest start command");

        let backends = Backends::from_config(config).await?;
        let ingestion = backends.ingestion()?;

        let progress = if self.json {
            ProgressReporter::noop()
        } else {
            ProgressReporter::new(Arc::new(|event: ProgressEvent| {
                eprintln!("{}", event.format_simple())
            }))
        };

        let uploaded = if self.skip_upload {
            Vec::new()
        } else {
            let dir = self
                .docs
                .clone()
                .unwrap_or_else(|| config.resolved_documents_path());
            let store = backends.policy_documents()?;
            let stats = upload_policy_documents(store.as_ref(), &dir, &progress).await?;

            if !self.json {
                println!("Uploaded {} files", stats.uploaded.len());
                for name in &stats.failed {
                    println!("  skipped {}", name);
                }
            }
            stats.uploaded
        };

        let job = if self.no_wait {
            let job = ingestion.start_job(Some(SYNC_DESCRIPTION)).await?;
            if !self.json {
                println!("Ingestion job {} started ({})", job.job_id, job.status);
            }
            job
        } else {
            let interval = self.interval.unwrap_or(config.poll_interval_secs).max(1);
            let options = PollOptions::default()
                .with_interval(Duration::from_secs(interval))
                .with_max_polls(self.max_polls);
            run_ingestion(ingestion.as_ref(), Some(SYNC_DESCRIPTION), &options, &progress).await?
        };

        if self.json {
            print_json(&serde_json::json!({
                "uploadedFiles": uploaded,
                "job": job,
            }))?;
        } else if job.status.is_terminal() {
            print_job(&job);
        }

        ensure_not_failed(&job)
    }
}

/// Show the status of an ingestion job
#[derive(Args, Debug)]
pub struct IngestStatusCommand {
    /// Ingestion job identifier
    pub job_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestStatusCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest status command for {}", self.job_id);

        let backends = Backends::from_config(config).await?;
        let job = backends.ingestion()?.job_status(&self.job_id).await?;

        if self.json {
            print_json(&job)?;
        } else {
            print_job(&job);
        }

        Ok(())
    }
}

fn print_job(job: &IngestionJob) {
    println!("Job {}: {}", job.job_id, job.status);
    if let Some(stats) = &job.statistics {
        println!(
            "  Documents: {} scanned, {} indexed, {} failed",
            stats.documents_scanned, stats.documents_indexed, stats.documents_failed
        );
    }
    for reason in &job.failure_reasons {
        println!("  Failure: {}", reason);
    }
}

fn ensure_not_failed(job: &IngestionJob) -> AppResult<()> {
    if job.status == IngestionStatus::Failed {
        return Err(AppError::Ingestion(format!(
            "Ingestion job {} failed",
            job.job_id
        )));
    }
    Ok(())
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            IngestAction::Start(cmd) => cmd.execute(config).await,
            IngestAction::Status(cmd) => cmd.execute(config).await,
        }
    }
}
