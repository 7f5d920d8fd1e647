//! Configuration management for the policyguide assistant.
//!
//! Configuration is layered, later sources winning:
//! 1. Built-in defaults
//! 2. Workspace config file (`.policyguide/config.yaml`)
//! 3. Environment variables (`AWS_REGION`, `KNOWLEDGE_BASE_ID`, ...)
//! 4. Command-line flags
//!
//! Identifiers of the managed services (buckets, knowledge base, data source)
//! are optional at load time and only required by the operations that use them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default hosted model.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-3-5-haiku-20241022-v1:0";

/// Default number of passages requested from the knowledge base.
pub const DEFAULT_MAX_RESULTS: u32 = 3;

/// Upper bound accepted by the retrieval service.
pub const MAX_RESULTS_LIMIT: u32 = 100;

/// Default generation budget.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default seconds between ingestion status polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default customer used when none is given.
pub const DEFAULT_CUSTOMER: &str = "john_doe";

/// Default prompt definition id.
pub const DEFAULT_PROMPT_ID: &str = "assistant.policy.default";

/// Name of the per-workspace state directory.
pub const WORKSPACE_DIR: &str = ".policyguide";

/// Known generation/retrieval backends.
pub const KNOWN_PROVIDERS: [&str; 2] = ["bedrock", "demo"];

/// Identifiers of the managed AWS resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSettings {
    /// AWS region for every client
    pub region: String,

    /// Bucket holding `customer_policy/{id}.txt`
    pub customer_policy_bucket: Option<String>,

    /// Bucket holding `policy_docs/` (knowledge base data source)
    pub policy_bucket: Option<String>,

    /// Bucket for general uploads; falls back to the customer policy bucket
    pub uploads_bucket: Option<String>,

    /// Knowledge base identifier
    pub knowledge_base_id: Option<String>,

    /// Knowledge base data source identifier
    pub data_source_id: Option<String>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .policyguide/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Backend set: "bedrock" (live AWS) or "demo" (offline canned data)
    pub provider: String,

    /// AWS resource identifiers
    pub aws: AwsSettings,

    /// Hosted model identifier
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Optional sampling temperature
    pub temperature: Option<f32>,

    /// Passages requested per query
    pub max_results: u32,

    /// Prompt definition id
    pub prompt_id: String,

    /// Customer used when a command gets no `--customer`
    pub default_customer: String,

    /// Seconds between ingestion status polls
    pub poll_interval_secs: u64,

    /// Local directory scanned for policy PDFs
    pub documents_path: PathBuf,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workspace: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub region: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub verbose: bool,
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    provider: Option<String>,
    aws: Option<AwsSection>,
    model: Option<ModelSection>,
    retrieval: Option<RetrievalSection>,
    ingestion: Option<IngestionSection>,
    assistant: Option<AssistantSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AwsSection {
    region: Option<String>,
    customer_policy_bucket: Option<String>,
    policy_bucket: Option<String>,
    uploads_bucket: Option<String>,
    knowledge_base_id: Option<String>,
    data_source_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelSection {
    id: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    max_results: Option<u32>,
    prompt_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestionSection {
    poll_interval_secs: Option<u64>,
    documents_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssistantSection {
    default_customer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "bedrock".to_string(),
            aws: AwsSettings {
                region: DEFAULT_REGION.to_string(),
                ..AwsSettings::default()
            },
            model: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            max_results: DEFAULT_MAX_RESULTS,
            prompt_id: DEFAULT_PROMPT_ID.to_string(),
            default_customer: DEFAULT_CUSTOMER.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            documents_path: PathBuf::from("policy_docs"),
            log_level: None,
            log_format: LogFormat::Pretty,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the workspace config file and the process environment.
    ///
    /// Environment variables:
    /// - `POLICYGUIDE_WORKSPACE`, `POLICYGUIDE_CONFIG`, `POLICYGUIDE_PROVIDER`
    /// - `AWS_REGION`, `CUSTOMER_POLICY_BUCKET`, `POLICY_BUCKET`, `UPLOADS_BUCKET`
    /// - `KNOWLEDGE_BASE_ID`, `DATA_SOURCE_ID`, `MODEL_ID`
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// # Example
    /// ```no_run
    /// use policyguide_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Region: {}", config.aws.region);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = lookup("POLICYGUIDE_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Some(config_file) = lookup("POLICYGUIDE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.workspace_dir().join("config.yaml"));

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        config.apply_env(lookup);

        Ok(config)
    }

    /// Apply environment variables on top of the current values.
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = non_empty("POLICYGUIDE_PROVIDER") {
            self.provider = provider;
        }
        if let Some(region) = non_empty("AWS_REGION") {
            self.aws.region = region;
        }
        if let Some(bucket) = non_empty("CUSTOMER_POLICY_BUCKET") {
            self.aws.customer_policy_bucket = Some(bucket);
        }
        if let Some(bucket) = non_empty("POLICY_BUCKET") {
            self.aws.policy_bucket = Some(bucket);
        }
        if let Some(bucket) = non_empty("UPLOADS_BUCKET") {
            self.aws.uploads_bucket = Some(bucket);
        }
        if let Some(id) = non_empty("KNOWLEDGE_BASE_ID") {
            self.aws.knowledge_base_id = Some(id);
        }
        if let Some(id) = non_empty("DATA_SOURCE_ID") {
            self.aws.data_source_id = Some(id);
        }
        if let Some(model) = non_empty("MODEL_ID") {
            self.model = model;
        }
        if let Some(level) = non_empty("RUST_LOG") {
            self.log_level = Some(level);
        }
        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(provider) = file.provider {
            self.provider = provider;
        }

        if let Some(aws) = file.aws {
            if let Some(region) = aws.region {
                self.aws.region = region;
            }
            self.aws.customer_policy_bucket =
                aws.customer_policy_bucket.or(self.aws.customer_policy_bucket.take());
            self.aws.policy_bucket = aws.policy_bucket.or(self.aws.policy_bucket.take());
            self.aws.uploads_bucket = aws.uploads_bucket.or(self.aws.uploads_bucket.take());
            self.aws.knowledge_base_id =
                aws.knowledge_base_id.or(self.aws.knowledge_base_id.take());
            self.aws.data_source_id = aws.data_source_id.or(self.aws.data_source_id.take());
        }

        if let Some(model) = file.model {
            if let Some(id) = model.id {
                self.model = id;
            }
            if let Some(max_tokens) = model.max_tokens {
                self.max_tokens = max_tokens;
            }
            if model.temperature.is_some() {
                self.temperature = model.temperature;
            }
        }

        if let Some(retrieval) = file.retrieval {
            if let Some(max_results) = retrieval.max_results {
                self.max_results = max_results;
            }
            if let Some(prompt_id) = retrieval.prompt_id {
                self.prompt_id = prompt_id;
            }
        }

        if let Some(ingestion) = file.ingestion {
            if let Some(secs) = ingestion.poll_interval_secs {
                self.poll_interval_secs = secs;
            }
            if let Some(path) = ingestion.documents_path {
                self.documents_path = path;
            }
        }

        if let Some(customer) = file.assistant.and_then(|a| a.default_customer) {
            self.default_customer = customer;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if let Some(format) = logging.format {
                self.log_format = format;
            }
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the config file and environment.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(workspace) = overrides.workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = overrides.config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(region) = overrides.region {
            self.aws.region = region;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if let Some(format) = overrides.log_format {
            self.log_format = format;
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .policyguide directory.
    pub fn workspace_dir(&self) -> PathBuf {
        self.workspace.join(WORKSPACE_DIR)
    }

    /// Whether the offline demo backends are selected.
    pub fn is_demo(&self) -> bool {
        self.provider.eq_ignore_ascii_case("demo")
    }

    /// Documents directory resolved against the workspace.
    pub fn resolved_documents_path(&self) -> PathBuf {
        if self.documents_path.is_absolute() {
            self.documents_path.clone()
        } else {
            self.workspace.join(&self.documents_path)
        }
    }

    /// Bucket holding customer policies.
    pub fn customer_policy_bucket(&self) -> AppResult<&str> {
        require(&self.aws.customer_policy_bucket, "CUSTOMER_POLICY_BUCKET")
    }

    /// Bucket holding knowledge base source documents.
    pub fn policy_bucket(&self) -> AppResult<&str> {
        require(&self.aws.policy_bucket, "POLICY_BUCKET")
    }

    /// Bucket for general uploads, defaulting to the customer policy bucket.
    pub fn uploads_bucket(&self) -> AppResult<&str> {
        match self.aws.uploads_bucket.as_deref() {
            Some(bucket) => Ok(bucket),
            None => self.customer_policy_bucket().map_err(|_| {
                AppError::Config(
                    "UPLOADS_BUCKET is not set (and no CUSTOMER_POLICY_BUCKET to fall back to)"
                        .to_string(),
                )
            }),
        }
    }

    /// Knowledge base identifier.
    pub fn knowledge_base_id(&self) -> AppResult<&str> {
        require(&self.aws.knowledge_base_id, "KNOWLEDGE_BASE_ID")
    }

    /// Knowledge base data source identifier.
    pub fn data_source_id(&self) -> AppResult<&str> {
        require(&self.aws.data_source_id, "DATA_SOURCE_ID")
    }

    /// Validate settings that do not depend on the command being run.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.max_results == 0 || self.max_results > MAX_RESULTS_LIMIT {
            return Err(AppError::Config(format!(
                "maxResults must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT, self.max_results
            )));
        }

        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "pollIntervalSecs must be at least 1".to_string(),
            ));
        }

        if self.aws.region.trim().is_empty() {
            return Err(AppError::Config("AWS region cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn require<'a>(value: &'a Option<String>, env_var: &str) -> AppResult<&'a str> {
    value.as_deref().ok_or_else(|| {
        AppError::Config(format!(
            "{} is not set. Export it or add it to {}/config.yaml, or run with --provider demo",
            env_var, WORKSPACE_DIR
        ))
    })
}
