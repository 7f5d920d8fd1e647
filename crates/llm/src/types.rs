//! Provider identification.

use serde::{Deserialize, Serialize};

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Amazon Bedrock runtime
    Bedrock,
    /// Offline keyword responder
    Demo,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bedrock" | "aws" => Some(Self::Bedrock),
            "demo" | "offline" => Some(Self::Demo),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bedrock => "bedrock",
            Self::Demo => "demo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("bedrock"), Some(ProviderType::Bedrock));
        assert_eq!(ProviderType::parse("AWS"), Some(ProviderType::Bedrock));
        assert_eq!(ProviderType::parse("demo"), Some(ProviderType::Demo));
        assert_eq!(ProviderType::parse("openai"), None);
    }

    #[test]
    fn test_round_trip_name() {
        for provider in [ProviderType::Bedrock, ProviderType::Demo] {
            assert_eq!(ProviderType::parse(provider.as_str()), Some(provider));
        }
    }
}
