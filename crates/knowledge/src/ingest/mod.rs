//! Document ingestion: uploads to object storage and knowledge base sync jobs.

pub mod bedrock;
pub mod demo;
pub mod poller;
pub mod uploader;

pub use bedrock::BedrockIngestion;
pub use demo::ImmediateIngestion;
pub use poller::{run_ingestion, wait_for_completion, PollOptions};
pub use uploader::{
    upload_customer_policy, upload_document, upload_policy_documents, upload_url,
    PresignedUpload, PRESIGN_EXPIRY,
};

use crate::types::IngestionJob;
use policyguide_core::AppResult;

/// Remote service that indexes uploaded documents.
#[async_trait::async_trait]
pub trait IngestionService: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Start a sync job over the configured data source.
    async fn start_job(&self, description: Option<&str>) -> AppResult<IngestionJob>;

    /// Current snapshot of a job.
    async fn job_status(&self, job_id: &str) -> AppResult<IngestionJob>;
}
