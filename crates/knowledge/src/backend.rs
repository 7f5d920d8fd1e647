//! Wiring of storage, retrieval, generation and ingestion backends.
//!
//! Live mode talks to S3 and Bedrock through one shared AWS configuration.
//! Demo mode runs entirely in memory with canned data.

use crate::ingest::{BedrockIngestion, ImmediateIngestion, IngestionService};
use crate::keys;
use crate::rag::{Assistant, AssistantSettings};
use crate::retrieval::{BedrockRetriever, DemoRetriever, Retriever};
use crate::storage::{MemoryStore, ObjectStore, S3Store};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use policyguide_core::{AppConfig, AppError, AppResult};
use policyguide_llm::{create_client, LlmClient};
use policyguide_prompt::load_prompt;
use std::sync::Arc;

/// Sample customers available in demo mode.
pub const DEMO_CUSTOMERS: [(&str, &str); 2] = [
    (
        "john_doe",
        "Policy Number: POL-123456
Coverage: Comprehensive Auto Insurance
Deductible: $500
Rental Car Coverage: Yes (up to $30/day)
Premium: $1,200/year
Vehicle: 2020 Honda Civic
Coverage Limits: $100,000/$300,000/$50,000",
    ),
    (
        "jane_smith",
        "Policy Number: POL-789012
Coverage: Full Coverage Auto Insurance
Deductible: $250
Rental Car Coverage: Yes (up to $50/day)
Premium: $1,500/year
Vehicle: 2021 Toyota Camry
Coverage Limits: $250,000/$500,000/$100,000",
    ),
];

/// In-memory stores shared by every demo component.
struct DemoStores {
    customer_policies: Arc<MemoryStore>,
    policy_documents: Arc<MemoryStore>,
    uploads: Arc<MemoryStore>,
}

impl DemoStores {
    fn seeded() -> Self {
        let customer_policies = DEMO_CUSTOMERS
            .iter()
            .fold(MemoryStore::new("demo-customer-policies"), |store, (id, text)| {
                store.with_text(keys::customer_policy_key(id), *text)
            });

        Self {
            customer_policies: Arc::new(customer_policies),
            policy_documents: Arc::new(MemoryStore::new("demo-policy-documents")),
            uploads: Arc::new(MemoryStore::new("demo-uploads")),
        }
    }
}

enum Mode {
    Live(SdkConfig),
    Demo(DemoStores),
}

/// Factory for the services a command needs.
///
/// Identifiers are checked when the component that needs them is built, so a
/// command only requires the variables it actually uses.
pub struct Backends {
    config: AppConfig,
    mode: Mode,
}

impl Backends {
    /// Select live or demo backends from the configuration.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let mode = if config.is_demo() {
            tracing::info!("Using offline demo backends");
            Mode::Demo(DemoStores::seeded())
        } else {
            tracing::debug!(region = %config.aws.region, "Loading AWS configuration");
            let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(config.aws.region.clone()))
                .load()
                .await;
            Mode::Live(sdk_config)
        };

        Ok(Self {
            config: config.clone(),
            mode,
        })
    }

    /// Demo backends regardless of the configured provider.
    pub fn demo(config: &AppConfig) -> Self {
        let mut config = config.clone();
        config.provider = "demo".to_string();
        Self {
            config,
            mode: Mode::Demo(DemoStores::seeded()),
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.mode, Mode::Demo(_))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Store holding `customer_policy/` objects.
    pub fn customer_policies(&self) -> AppResult<Arc<dyn ObjectStore>> {
        match &self.mode {
            Mode::Live(sdk) => Ok(Arc::new(S3Store::new(
                sdk,
                self.config.customer_policy_bucket()?,
            ))),
            Mode::Demo(stores) => Ok(stores.customer_policies.clone()),
        }
    }

    /// Store holding `policy_docs/`, the knowledge base data source.
    pub fn policy_documents(&self) -> AppResult<Arc<dyn ObjectStore>> {
        match &self.mode {
            Mode::Live(sdk) => Ok(Arc::new(S3Store::new(sdk, self.config.policy_bucket()?))),
            Mode::Demo(stores) => Ok(stores.policy_documents.clone()),
        }
    }

    /// Store for general uploads.
    pub fn uploads(&self) -> AppResult<Arc<dyn ObjectStore>> {
        match &self.mode {
            Mode::Live(sdk) => Ok(Arc::new(S3Store::new(sdk, self.config.uploads_bucket()?))),
            Mode::Demo(stores) => Ok(stores.uploads.clone()),
        }
    }

    pub fn retriever(&self) -> AppResult<Arc<dyn Retriever>> {
        match &self.mode {
            Mode::Live(sdk) => Ok(Arc::new(BedrockRetriever::new(
                sdk,
                self.config.knowledge_base_id()?,
            ))),
            Mode::Demo(_) => Ok(Arc::new(DemoRetriever)),
        }
    }

    pub fn llm(&self) -> AppResult<Arc<dyn LlmClient>> {
        let sdk = match &self.mode {
            Mode::Live(sdk) => Some(sdk),
            Mode::Demo(_) => None,
        };
        create_client(&self.config.provider, sdk).map_err(AppError::Config)
    }

    pub fn ingestion(&self) -> AppResult<Arc<dyn IngestionService>> {
        match &self.mode {
            Mode::Live(sdk) => Ok(Arc::new(BedrockIngestion::new(
                sdk,
                self.config.knowledge_base_id()?,
                self.config.data_source_id()?,
            ))),
            Mode::Demo(_) => Ok(Arc::new(ImmediateIngestion)),
        }
    }

    /// Assistant using the workspace prompt and configured settings.
    pub fn assistant(&self) -> AppResult<Assistant> {
        let prompt = load_prompt(&self.config.workspace, &self.config.prompt_id)?;

        Ok(Assistant::new(
            self.customer_policies()?,
            self.retriever()?,
            self.llm()?,
            AssistantSettings::from_config(&self.config),
        )
        .with_prompt(prompt))
    }
}
