//! Bedrock Knowledge Base ingestion jobs.

use super::IngestionService;
use crate::types::{IngestionJob, IngestionStatistics, IngestionStatus};
use aws_config::SdkConfig;
use aws_sdk_bedrockagent::error::DisplayErrorContext;
use aws_sdk_bedrockagent::types::{
    IngestionJob as RemoteJob, IngestionJobStatistics, IngestionJobStatus,
};
use aws_sdk_bedrockagent::Client;
use policyguide_core::{AppError, AppResult};

/// Ingestion jobs for one knowledge base data source.
pub struct BedrockIngestion {
    client: Client,
    knowledge_base_id: String,
    data_source_id: String,
}

impl BedrockIngestion {
    pub fn new(
        sdk_config: &SdkConfig,
        knowledge_base_id: impl Into<String>,
        data_source_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(sdk_config),
            knowledge_base_id: knowledge_base_id.into(),
            data_source_id: data_source_id.into(),
        }
    }
}

/// Accepts both required and optional SDK members.
fn present<T>(member: impl Into<Option<T>>) -> Option<T> {
    member.into()
}

fn convert_statistics(stats: IngestionJobStatistics) -> IngestionStatistics {
    let count = |value: Option<i64>| value.unwrap_or(0).max(0) as u64;
    IngestionStatistics {
        documents_scanned: count(present(stats.number_of_documents_scanned)),
        documents_indexed: count(present(stats.number_of_new_documents_indexed))
            + count(present(stats.number_of_modified_documents_indexed)),
        documents_failed: count(present(stats.number_of_documents_failed)),
    }
}

fn convert_job(job: RemoteJob) -> AppResult<IngestionJob> {
    let job_id = present::<String>(job.ingestion_job_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Ingestion("Ingestion job has no id".to_string()))?;

    let status = present::<IngestionJobStatus>(job.status)
        .map(|s| IngestionStatus::from_remote(s.as_str()))
        .unwrap_or(IngestionStatus::Running);

    Ok(IngestionJob {
        job_id,
        status,
        statistics: job.statistics.map(convert_statistics),
        failure_reasons: present::<Vec<String>>(job.failure_reasons).unwrap_or_default(),
    })
}

#[async_trait::async_trait]
impl IngestionService for BedrockIngestion {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn start_job(&self, description: Option<&str>) -> AppResult<IngestionJob> {
        tracing::info!(
            knowledge_base = %self.knowledge_base_id,
            data_source = %self.data_source_id,
            "Starting ingestion job"
        );

        let output = self
            .client
            .start_ingestion_job()
            .knowledge_base_id(&self.knowledge_base_id)
            .data_source_id(&self.data_source_id)
            .set_description(description.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                AppError::Ingestion(format!(
                    "StartIngestionJob failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let job = present::<RemoteJob>(output.ingestion_job)
            .ok_or_else(|| AppError::Ingestion("StartIngestionJob returned no job".to_string()))?;

        convert_job(job)
    }

    async fn job_status(&self, job_id: &str) -> AppResult<IngestionJob> {
        let output = self
            .client
            .get_ingestion_job()
            .knowledge_base_id(&self.knowledge_base_id)
            .data_source_id(&self.data_source_id)
            .ingestion_job_id(job_id)
            .send()
            .await
            .map_err(|e| {
                AppError::Ingestion(format!(
                    "GetIngestionJob {} failed: {}",
                    job_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        let job = present::<RemoteJob>(output.ingestion_job)
            .ok_or_else(|| AppError::Ingestion(format!("Ingestion job {} not found", job_id)))?;

        convert_job(job)
    }
}
