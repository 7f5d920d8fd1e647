//! Built-in prompt definitions.

use crate::types::PromptDefinition;

pub use policyguide_core::config::DEFAULT_PROMPT_ID;

/// Policy section, general-context section, question, instructions.
pub const DEFAULT_TEMPLATE: &str = "\
You are an expert insurance policy assistant. Use the following information to provide accurate, helpful responses:

CUSTOMER'S SPECIFIC POLICY:
{{policy}}

GENERAL INSURANCE POLICY INFORMATION:
{{context}}

CUSTOMER QUESTION: {{question}}

Please provide a comprehensive response that:
1. Addresses the customer's specific policy details
2. References relevant general policy information
3. Includes clear explanations and next steps if applicable
4. Cites sources when possible

Response:";

/// The built-in definition used when the workspace has no override.
pub fn default_definition() -> PromptDefinition {
    PromptDefinition {
        id: DEFAULT_PROMPT_ID.to_string(),
        title: "Insurance policy assistant".to_string(),
        api_version: "1.0".to_string(),
        description: "Grounds answers in the customer's policy and general policy documents"
            .to_string(),
        max_passages: None,
        template: DEFAULT_TEMPLATE.to_string(),
    }
}
