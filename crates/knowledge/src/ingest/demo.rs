//! Ingestion service for demo mode: every job completes at once.

use super::IngestionService;
use crate::types::{IngestionJob, IngestionStatistics, IngestionStatus};
use policyguide_core::AppResult;

#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateIngestion;

#[async_trait::async_trait]
impl IngestionService for ImmediateIngestion {
    fn name(&self) -> &str {
        "demo"
    }

    async fn start_job(&self, description: Option<&str>) -> AppResult<IngestionJob> {
        let job_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(job_id = %job_id, description = ?description, "Demo ingestion job started");
        Ok(IngestionJob::new(job_id, IngestionStatus::Pending))
    }

    async fn job_status(&self, job_id: &str) -> AppResult<IngestionJob> {
        let mut job = IngestionJob::new(job_id, IngestionStatus::Complete);
        job.statistics = Some(IngestionStatistics::default());
        Ok(job)
    }
}
