//! Prompt builder for rendering the grounding prompt.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
use handlebars::Handlebars;
use policyguide_core::{AppError, AppResult};
use std::collections::BTreeMap;

/// Inputs rendered into a prompt template.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    /// Customer policy text, empty when none was found
    pub policy: &'a str,

    /// Retrieved passage texts in relevance order
    pub passages: &'a [String],

    /// The customer's question
    pub question: &'a str,
}

impl<'a> PromptInputs<'a> {
    pub fn new(policy: &'a str, passages: &'a [String], question: &'a str) -> Self {
        Self {
            policy,
            passages,
            question,
        }
    }
}

/// Build a prompt from a definition and its inputs.
///
/// At most `max_passages` passages are joined into the context section, further
/// capped by the definition's own `maxPassages`. Rendering is pure: the same
/// inputs always produce the same text, and empty policy or context still
/// produce every section header.
///
/// # Example
/// ```
/// use policyguide_prompt::{build_prompt, default_definition, PromptInputs};
///
/// let passages = vec!["Collision covers accidents.".to_string()];
/// let inputs = PromptInputs::new("Deductible: $500", &passages, "Is hail covered?");
/// let built = build_prompt(&default_definition(), &inputs, 3).unwrap();
/// assert!(built.text.contains("CUSTOMER QUESTION: Is hail covered?"));
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    inputs: &PromptInputs<'_>,
    max_passages: usize,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let limit = definition
        .max_passages
        .map_or(max_passages, |cap| cap.min(max_passages));
    let passages_included = inputs.passages.len().min(limit);
    let context = build_context(inputs.passages, limit);

    let mut variables = BTreeMap::new();
    variables.insert("policy".to_string(), inputs.policy.to_string());
    variables.insert("context".to_string(), context);
    variables.insert("question".to_string(), inputs.question.to_string());

    let text = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            passages_included,
            policy_included: !inputs.policy.trim().is_empty(),
            resolved_variables: variables,
        },
    })
}

/// Join the first `limit` passages with a blank line between them.
pub fn build_context(passages: &[String], limit: usize) -> String {
    passages
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &BTreeMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::default_definition;

    fn passages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_sections_in_order() {
        let context = passages(&["Rental reimbursement is optional.", "Collision covers accidents."]);
        let inputs = PromptInputs::new("Deductible: $500", &context, "Do I have rental coverage?");
        let built = build_prompt(&default_definition(), &inputs, 3).unwrap();

        let policy_at = built.text.find("CUSTOMER'S SPECIFIC POLICY:").unwrap();
        let general_at = built.text.find("GENERAL INSURANCE POLICY INFORMATION:").unwrap();
        let question_at = built.text.find("CUSTOMER QUESTION:").unwrap();
        assert!(policy_at < general_at && general_at < question_at);

        assert!(built.text.contains(
            "Rental reimbursement is optional.\n\nCollision covers accidents."
        ));
        assert!(built.text.contains("CUSTOMER QUESTION: Do I have rental coverage?"));
        assert!(built.text.trim_end().ends_with("Response:"));
        assert_eq!(built.metadata.passages_included, 2);
        assert!(built.metadata.policy_included);
    }

    #[test]
    fn test_deterministic() {
        let context = passages(&["a", "b"]);
        let inputs = PromptInputs::new("policy", &context, "question");
        let first = build_prompt(&default_definition(), &inputs, 3).unwrap();
        let second = build_prompt(&default_definition(), &inputs, 3).unwrap();
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_empty_policy_and_context_keep_headers() {
        let inputs = PromptInputs::new("", &[], "What is my deductible?");
        let built = build_prompt(&default_definition(), &inputs, 3).unwrap();

        assert!(built.text.contains("CUSTOMER'S SPECIFIC POLICY:\n\n"));
        assert!(built.text.contains("GENERAL INSURANCE POLICY INFORMATION:\n\n"));
        assert_eq!(built.metadata.passages_included, 0);
        assert!(!built.metadata.policy_included);
    }

    #[test]
    fn test_passage_limit() {
        let context = passages(&["one", "two", "three", "four"]);
        let inputs = PromptInputs::new("", &context, "q");
        let built = build_prompt(&default_definition(), &inputs, 2).unwrap();

        assert!(built.text.contains("one\n\ntwo"));
        assert!(!built.text.contains("three"));
        assert_eq!(built.metadata.passages_included, 2);
    }

    #[test]
    fn test_definition_cap_applies() {
        let mut definition = default_definition();
        definition.max_passages = Some(1);
        let context = passages(&["one", "two"]);
        let inputs = PromptInputs::new("", &context, "q");
        let built = build_prompt(&definition, &inputs, 3).unwrap();
        assert!(!built.text.contains("two"));
    }

    #[test]
    fn test_no_html_escaping() {
        let inputs = PromptInputs::new("Limits: <$50,000> & more", &[], "Is \"glass\" covered?");
        let built = build_prompt(&default_definition(), &inputs, 3).unwrap();
        assert!(built.text.contains("<$50,000> & more"));
        assert!(built.text.contains("\"glass\""));
    }

    #[test]
    fn test_invalid_template_is_error() {
        let mut definition = default_definition();
        definition.template = "{{#if}}".to_string();
        let inputs = PromptInputs::new("", &[], "q");
        assert!(build_prompt(&definition, &inputs, 3).is_err());
    }

    #[test]
    fn test_build_context() {
        assert_eq!(build_context(&passages(&["x", "y"]), 5), "x\n\ny");
        assert_eq!(build_context(&[], 3), "");
    }
}
