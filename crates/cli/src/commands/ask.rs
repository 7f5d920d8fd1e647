//! Ask command handler.
//!
//! Answers one question for one customer and exits.

use super::{print_json, print_sources};
use clap::Args;
use policyguide_core::config::{AppConfig, MAX_RESULTS_LIMIT};
use policyguide_core::{AppError, AppResult};
use policyguide_knowledge::Backends;

/// Ask a single question about a customer's policy
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Customer whose policy grounds the answer
    #[arg(short = 'u', long)]
    pub customer: Option<String>,

    /// Passages to retrieve from the knowledge base (1-100)
    #[arg(short = 'k', long)]
    pub max_results: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let config = with_max_results(config, self.max_results)?;
        let customer = self
            .customer
            .clone()
            .unwrap_or_else(|| config.default_customer.clone());

        let backends = Backends::from_config(&config).await?;
        let mut assistant = backends.assistant()?;

        let answer = assistant.chat(&self.question, &customer).await?;

        tracing::debug!(
            "Answer: model={}, passages={}, policy_used={}, failed={}",
            answer.model_used,
            answer.retrieved_docs_count,
            answer.customer_policy_used,
            answer.generation_failed
        );

        if self.json {
            print_json(&answer)?;
        } else {
            println!("{}", answer.response);
            println!();
            print_sources(&answer.sources);
        }

        Ok(())
    }
}

/// Apply a `--max-results` override after checking its range.
pub(crate) fn with_max_results(config: &AppConfig, max_results: Option<u32>) -> AppResult<AppConfig> {
    let mut config = config.clone();
    if let Some(n) = max_results {
        if n == 0 || n > MAX_RESULTS_LIMIT {
            return Err(AppError::Validation(format!(
                "--max-results must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT, n
            )));
        }
        config.max_results = n;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_results_override() {
        let config = AppConfig::default();
        assert_eq!(with_max_results(&config, None).unwrap().max_results, 3);
        assert_eq!(with_max_results(&config, Some(7)).unwrap().max_results, 7);
        assert!(with_max_results(&config, Some(0)).is_err());
        assert!(with_max_results(&config, Some(101)).is_err());
    }
}
