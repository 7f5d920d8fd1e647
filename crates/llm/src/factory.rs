//! LLM provider factory.
//!
//! Resolves a provider name from configuration into a client.

use crate::client::LlmClient;
use crate::providers::{BedrockClient, DemoClient};
use crate::types::ProviderType;
use aws_config::SdkConfig;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("bedrock", "demo")
/// * `sdk_config` - Shared AWS configuration, required by "bedrock"
///
/// # Errors
/// Returns error if the provider is unknown or Bedrock is requested without
/// an AWS configuration.
pub fn create_client(
    provider: &str,
    sdk_config: Option<&SdkConfig>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    match provider_type {
        ProviderType::Bedrock => {
            let sdk_config = sdk_config
                .ok_or_else(|| "Bedrock provider requires an AWS configuration".to_string())?;
            Ok(Arc::new(BedrockClient::new(sdk_config)))
        }
        ProviderType::Demo => Ok(Arc::new(DemoClient::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_demo_client() {
        let client = create_client("demo", None).unwrap();
        assert_eq!(client.provider_name(), "demo");
    }

    #[test]
    fn test_bedrock_requires_sdk_config() {
        match create_client("bedrock", None) {
            Err(err) => assert!(err.contains("requires an AWS configuration")),
            Ok(_) => panic!("Expected error for Bedrock without AWS configuration"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
