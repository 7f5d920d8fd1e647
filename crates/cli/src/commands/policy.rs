//! Policy command handler.
//!
//! Shows and replaces the per-customer policy documents.

use super::print_json;
use clap::{Args, Subcommand};
use policyguide_core::{config::AppConfig, AppResult};
use policyguide_knowledge::document::file_name_of;
use policyguide_knowledge::ingest::upload_customer_policy;
use policyguide_knowledge::keys::customer_policy_key;
use policyguide_knowledge::Backends;
use std::path::PathBuf;

/// Show or upload customer policies
#[derive(Args, Debug)]
pub struct PolicyCommand {
    #[command(subcommand)]
    pub action: PolicyAction,
}

#[derive(Subcommand, Debug)]
pub enum PolicyAction {
    /// Print a customer's policy
    Show(PolicyShowCommand),
    /// Store a customer's policy from a file
    Upload(PolicyUploadCommand),
}

/// Print a customer's policy
#[derive(Args, Debug)]
pub struct PolicyShowCommand {
    /// Customer identifier
    pub customer: String,
}

impl PolicyShowCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing policy show for '{}'", self.customer);

        let backends = Backends::from_config(config).await?;
        let store = backends.customer_policies()?;

        match store.get_text(&customer_policy_key(&self.customer)).await? {
            Some(text) => println!("{}", text.trim()),
            None => println!("No policy found for customer {}.", self.customer),
        }

        Ok(())
    }
}

/// Store a customer's policy from a file
#[derive(Args, Debug)]
pub struct PolicyUploadCommand {
    /// Customer identifier
    pub customer: String,

    /// Policy file (.txt, or any file decoded as text)
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PolicyUploadCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing policy upload for '{}'", self.customer);

        let filename = file_name_of(&self.file)?;
        let content = tokio::fs::read(&self.file).await?;

        let backends = Backends::from_config(config).await?;
        let store = backends.customer_policies()?;

        let receipt =
            upload_customer_policy(store.as_ref(), &self.customer, &filename, &content).await?;

        if self.json {
            print_json(&receipt)?;
        } else {
            println!(
                "Customer policy uploaded for {} to s3://{}/{} ({} bytes)",
                self.customer, receipt.bucket, receipt.key, receipt.size_bytes
            );
        }

        Ok(())
    }
}

impl PolicyCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            PolicyAction::Show(cmd) => cmd.execute(config).await,
            PolicyAction::Upload(cmd) => cmd.execute(config).await,
        }
    }
}
