//! The insurance policy assistant.

use super::session::ConversationHistory;
use super::types::{ChatAnswer, ConversationTurn, SourceCitation, APOLOGY_RESPONSE};
use crate::keys;
use crate::retrieval::{clamp_max_results, retrieve_or_empty, Retriever};
use crate::storage::ObjectStore;
use chrono::Utc;
use policyguide_core::config::{DEFAULT_MAX_RESULTS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID};
use policyguide_core::{AppConfig, AppError, AppResult};
use policyguide_llm::{LlmClient, LlmRequest};
use policyguide_prompt::{build_prompt, default_definition, PromptDefinition, PromptInputs};
use std::sync::Arc;

/// Generation and retrieval parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// Passages requested per query
    pub max_results: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl AssistantSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_results: config.max_results,
        }
    }
}

/// RAG orchestrator with per-session history.
///
/// Each chat is a sequential chain: customer policy fetch, passage retrieval,
/// prompt composition, generation. Failures of the external calls degrade the
/// answer instead of failing the chat.
pub struct Assistant {
    policies: Arc<dyn ObjectStore>,
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    settings: AssistantSettings,
    history: ConversationHistory,
}

impl Assistant {
    pub fn new(
        policies: Arc<dyn ObjectStore>,
        retriever: Arc<dyn Retriever>,
        llm: Arc<dyn LlmClient>,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            policies,
            retriever,
            llm,
            prompt: default_definition(),
            settings,
            history: ConversationHistory::new(),
        }
    }

    /// Use a different prompt definition.
    pub fn with_prompt(mut self, prompt: PromptDefinition) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The customer's policy text, or an empty string when there is none.
    ///
    /// Missing objects and storage failures both yield `""`.
    pub async fn customer_policy(&self, customer_id: &str) -> String {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return String::new();
        }

        let key = keys::customer_policy_key(customer_id);
        match self.policies.get_text(&key).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!("No policy on file for customer {}", customer_id);
                String::new()
            }
            Err(e) => {
                tracing::warn!("Error retrieving customer policy for {}: {}", customer_id, e);
                String::new()
            }
        }
    }

    /// Answer a question for a customer and record the turn.
    pub async fn chat(&mut self, query: &str, customer_id: &str) -> AppResult<ChatAnswer> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Query is required".to_string()));
        }

        tracing::info!(customer = customer_id, "Answering query");

        let policy = self.customer_policy(customer_id).await;

        let max_results = clamp_max_results(self.settings.max_results);
        let passages = retrieve_or_empty(self.retriever.as_ref(), query, max_results).await;
        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();

        let built = build_prompt(
            &self.prompt,
            &PromptInputs::new(&policy, &texts, query),
            max_results as usize,
        )?;

        let (response, model_used, generation_failed) = self.generate(&built.text).await;

        let sources: Vec<SourceCitation> = passages
            .iter()
            .take(built.metadata.passages_included)
            .map(SourceCitation::from_passage)
            .collect();

        let timestamp = Utc::now();

        self.history.push(ConversationTurn {
            query: query.to_string(),
            response: response.clone(),
            timestamp,
            customer_id: customer_id.to_string(),
            sources: sources.clone(),
        });

        Ok(ChatAnswer {
            response,
            sources,
            model_used,
            retrieved_docs_count: passages.len(),
            customer_policy_used: built.metadata.policy_included,
            generation_failed,
            timestamp,
        })
    }

    /// Call the model, substituting the apology on failure.
    async fn generate(&self, prompt: &str) -> (String, String, bool) {
        let mut request = LlmRequest::new(prompt, &self.settings.model)
            .with_max_tokens(self.settings.max_tokens);
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }

        match self.llm.complete(&request).await {
            Ok(response) => (response.content, response.model, false),
            Err(e) => {
                tracing::warn!(
                    provider = self.llm.provider_name(),
                    "Error generating response: {}",
                    e
                );
                (
                    APOLOGY_RESPONSE.to_string(),
                    self.settings.model.clone(),
                    true,
                )
            }
        }
    }
}
