//! policyguide CLI
//!
//! Main entry point for the policyguide command-line tool.
//! Answers insurance policy questions grounded in the customer's policy and
//! the general policy knowledge base, and manages document ingestion.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    AskCommand, ChatCommand, IngestCommand, PolicyCommand, UploadCommand, UploadUrlCommand,
};
use policyguide_core::config::{AppConfig, ConfigOverrides};
use policyguide_core::logging::{self, LogFormat};
use policyguide_core::{AppError, AppResult};
use std::path::PathBuf;

/// Insurance policy assistant backed by a managed knowledge base
#[derive(Parser, Debug)]
#[command(name = "policyguide")]
#[command(about = "Insurance policy assistant backed by a managed knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "POLICYGUIDE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "POLICYGUIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Backend set: bedrock (live AWS) or demo (offline)
    #[arg(short, long, global = true, env = "POLICYGUIDE_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// AWS region
    #[arg(long, global = true)]
    region: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question about a customer's policy
    Ask(AskCommand),

    /// Interactive chat session
    Chat(ChatCommand),

    /// Show or upload customer policies
    Policy(PolicyCommand),

    /// Upload a general document
    Upload(UploadCommand),

    /// Create a presigned upload URL
    UploadUrl(UploadUrlCommand),

    /// Upload policy documents and sync the knowledge base
    Ingest(IngestCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Ask(_) => "ask",
            Commands::Chat(_) => "chat",
            Commands::Policy(_) => "policy",
            Commands::Upload(_) => "upload",
            Commands::UploadUrl(_) => "upload-url",
            Commands::Ingest(_) => "ingest",
        }
    }
}

fn load_config(cli: &Cli) -> AppResult<AppConfig> {
    // Clap has already resolved these from flags or their env vars
    let config = AppConfig::load_with(|key| match key {
        "POLICYGUIDE_WORKSPACE" => cli
            .workspace
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        "POLICYGUIDE_CONFIG" => cli
            .config
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        other => std::env::var(other).ok(),
    })?;

    let log_format = match cli.log_format.as_deref() {
        Some(name) => Some(LogFormat::parse(name).ok_or_else(|| {
            AppError::Config(format!("Unknown log format: {}. Use pretty or json", name))
        })?),
        None => None,
    };

    let config = config.with_overrides(ConfigOverrides {
        workspace: cli.workspace.clone(),
        config_file: cli.config.clone(),
        provider: cli.provider.clone(),
        model: cli.model.clone(),
        region: cli.region.clone(),
        log_level: cli.log_level.clone(),
        log_format,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    logging::init_logging(config.log_level.as_deref(), config.log_format, config.no_color)?;

    tracing::info!("policyguide starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Policy(cmd) => cmd.execute(&config).await,
        Commands::Upload(cmd) => cmd.execute(&config).await,
        Commands::UploadUrl(cmd) => cmd.execute(&config).await,
        Commands::Ingest(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "policyguide",
            "--provider",
            "demo",
            "ask",
            "What is my deductible?",
            "--customer",
            "jane_smith",
            "--max-results",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.provider.as_deref(), Some("demo"));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question, "What is my deductible?");
                assert_eq!(cmd.customer.as_deref(), Some("jane_smith"));
                assert_eq!(cmd.max_results, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ingest_start() {
        let cli = Cli::try_parse_from([
            "policyguide",
            "ingest",
            "start",
            "--interval",
            "5",
            "--max-polls",
            "10",
            "--no-wait",
        ])
        .unwrap();
        assert_eq!(cli.command.name(), "ingest");
    }
}
