//! Prompt types for the policyguide assistant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A prompt definition, built in or loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// What the prompt is for
    #[serde(default)]
    pub description: String,

    /// Cap on retrieved passages rendered into the context section
    #[serde(rename = "maxPassages", default, skip_serializing_if = "Option::is_none")]
    pub max_passages: Option<usize>,

    /// Template string with Handlebars syntax.
    /// Variables: `policy`, `context`, `question`.
    pub template: String,
}

/// A fully rendered prompt ready for the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Passages rendered into the context section
    #[serde(rename = "passagesIncluded")]
    pub passages_included: usize,

    /// Whether a non-empty customer policy was rendered
    #[serde(rename = "policyIncluded")]
    pub policy_included: bool,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: assistant.policy.brief
title: Brief answers
apiVersion: "1.0"
maxPassages: 2
template: "{{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "assistant.policy.brief");
        assert_eq!(def.max_passages, Some(2));
        assert!(def.description.is_empty());
    }

    #[test]
    fn test_prompt_definition_without_cap() {
        let yaml = "id: a.b\ntitle: T\napiVersion: \"1.0\"\ntemplate: x\n";
        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.max_passages, None);
    }
}
