//! Offline demo provider.
//!
//! Answers from a small table of canned insurance responses picked by keyword,
//! so the assistant can be exercised without cloud credentials.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use policyguide_core::AppResult;

/// Model name reported by demo responses.
pub const DEMO_MODEL: &str = "demo";

/// Deductible quoted when the prompt carries no policy line for it.
const DEFAULT_DEDUCTIBLE: &str = "$500";

/// Daily rental limit quoted when the policy does not state one.
const DEFAULT_RENTAL_LIMIT: &str = "$30";

/// Canned responses, checked in order; the first matching keyword wins.
const RESPONSES: &[(&[&str], &str)] = &[
    (
        &["deductible", "pay", "cost"],
        "Your deductible is the amount you pay out of pocket before insurance coverage kicks in. \
         Based on your policy, your deductible is {deductible}.",
    ),
    (
        &["rental", "car", "replacement"],
        "Rental car coverage provides a temporary replacement vehicle while your car is being \
         repaired. Your policy includes rental coverage up to {rental_limit} per day.",
    ),
    (
        &["claim", "file", "accident"],
        "To file a claim: 1) Contact us immediately at 1-800-CLAIMS, 2) Provide your policy number \
         and incident details, 3) Take photos if safe to do so, 4) Get a police report if required, \
         5) We'll assign an adjuster within 24 hours.",
    ),
    (
        &["coverage", "covered", "include"],
        "Your policy includes comprehensive, collision, and liability coverage. Comprehensive \
         covers theft, vandalism, weather damage. Collision covers accidents. Liability covers \
         damage to others.",
    ),
];

const FALLBACK_RESPONSE: &str = "I can help you with questions about your insurance policy including \
     coverage details, deductibles, claims process, and policy terms. What specific information \
     would you like to know?";

/// Keyword-matching demo client.
#[derive(Debug, Default, Clone)]
pub struct DemoClient;

impl DemoClient {
    pub fn new() -> Self {
        Self
    }

    /// Pick the canned answer for a rendered prompt.
    pub fn answer(prompt: &str) -> String {
        let question = extract_question(prompt).to_lowercase();

        let template = RESPONSES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
            .map(|(_, response)| *response)
            .unwrap_or(FALLBACK_RESPONSE);

        let deductible = extract_deductible(prompt).unwrap_or(DEFAULT_DEDUCTIBLE);
        let rental_limit = extract_rental_limit(prompt).unwrap_or(DEFAULT_RENTAL_LIMIT);
        template
            .replace("{deductible}", deductible)
            .replace("{rental_limit}", rental_limit)
    }
}

/// The customer question from the rendered prompt, or the whole prompt.
fn extract_question(prompt: &str) -> &str {
    prompt
        .lines()
        .find_map(|line| line.trim().strip_prefix("CUSTOMER QUESTION:"))
        .map(str::trim)
        .unwrap_or(prompt)
}

/// Value of the first `label: value` line whose label satisfies `matches`.
fn policy_value(prompt: &str, matches: impl Fn(&str) -> bool) -> Option<&str> {
    prompt.lines().find_map(|line| {
        let line = line.trim().trim_start_matches(['•', '-', '*']).trim();
        let (label, value) = line.split_once(':')?;
        let value = value.trim();
        (matches(label.trim()) && !value.is_empty()).then_some(value)
    })
}

/// Value of the first `Deductible:` line in the prompt.
fn extract_deductible(prompt: &str) -> Option<&str> {
    policy_value(prompt, |label| label.eq_ignore_ascii_case("deductible"))
}

/// Dollar amount on the first `Rental ...:` line, e.g. `$50` from `Yes (up to $50/day)`.
fn extract_rental_limit(prompt: &str) -> Option<&str> {
    let value = policy_value(prompt, |label| {
        label.to_ascii_lowercase().starts_with("rental")
    })?;
    dollar_amount(value)
}

fn dollar_amount(text: &str) -> Option<&str> {
    let start = text.find('$')?;
    let digits = &text[start + 1..];
    let len = digits
        .find(|c: char| !(c.is_ascii_digit() || c == ','))
        .unwrap_or(digits.len());
    let amount = digits[..len].trim_end_matches(',');
    (!amount.is_empty()).then(|| &text[start..start + 1 + amount.len()])
}

#[async_trait::async_trait]
impl LlmClient for DemoClient {
    fn provider_name(&self) -> &str {
        "demo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!("Answering from demo response table");

        let content = Self::answer(&request.prompt);
        let prompt_words = request.prompt.split_whitespace().count() as u32;
        let answer_words = content.split_whitespace().count() as u32;

        Ok(LlmResponse {
            content,
            model: DEMO_MODEL.to_string(),
            usage: LlmUsage::new(prompt_words, answer_words),
            stop_reason: Some("end_turn".to_string()),
        })
    }
}
