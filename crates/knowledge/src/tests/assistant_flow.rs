//! Chat orchestration against fakes.

use super::fakes::{BrokenStore, FailingLlm, FailingRetriever, RecordingLlm, StaticRetriever};
use crate::keys::customer_policy_key;
use crate::rag::{Assistant, AssistantSettings, APOLOGY_RESPONSE};
use crate::storage::MemoryStore;
use crate::types::RetrievedPassage;
use policyguide_core::AppError;
use std::sync::Arc;

const POLICY: &str = "Policy Number: POL-123456\nDeductible: $500";

fn policies() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new("customers").with_text(customer_policy_key("john_doe"), POLICY))
}

fn passages() -> Vec<RetrievedPassage> {
    vec![
        RetrievedPassage::new("Collision covers accidents.", "auto.pdf", 0.91)
            .with_uri("s3://docs/policy_docs/auto.pdf"),
        RetrievedPassage::new("Comprehensive covers theft and hail.", "auto.pdf", 0.83),
        RetrievedPassage::new("Rental reimbursement is optional.", "rental.pdf", 0.60),
        RetrievedPassage::new("Roadside assistance is included.", "extras.pdf", 0.40),
    ]
}

fn settings(max_results: u32) -> AssistantSettings {
    AssistantSettings {
        model: "test-model".to_string(),
        max_results,
        ..AssistantSettings::default()
    }
}

#[tokio::test]
async fn test_chat_grounds_prompt_in_policy_and_passages() {
    let llm = Arc::new(RecordingLlm::new("Your deductible is $500."));
    let retriever = Arc::new(StaticRetriever::new(passages()));
    let mut assistant = Assistant::new(policies(), retriever.clone(), llm.clone(), settings(3));

    let answer = assistant
        .chat("What is my deductible?", "john_doe")
        .await
        .unwrap();

    assert_eq!(answer.response, "Your deductible is $500.");
    assert_eq!(answer.model_used, "test-model");
    assert_eq!(answer.retrieved_docs_count, 3);
    assert!(answer.customer_policy_used);
    assert!(!answer.generation_failed);
    assert_eq!(answer.sources.len(), 3);
    assert_eq!(answer.sources[0].title, "auto.pdf");

    let prompt = llm.last_prompt();
    assert!(prompt.contains("CUSTOMER'S SPECIFIC POLICY:\nPolicy Number: POL-123456"));
    assert!(prompt.contains(
        "Collision covers accidents.\n\nComprehensive covers theft and hail.\n\nRental reimbursement is optional."
    ));
    assert!(!prompt.contains("Roadside"));
    assert!(prompt.contains("CUSTOMER QUESTION: What is my deductible?"));

    assert_eq!(*retriever.requested.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn test_zero_max_results_uses_one_passage_throughout() {
    let llm = Arc::new(RecordingLlm::new("ok"));
    let retriever = Arc::new(StaticRetriever::new(passages()));
    let mut assistant = Assistant::new(policies(), retriever.clone(), llm.clone(), settings(0));

    let answer = assistant.chat("Is hail covered?", "john_doe").await.unwrap();

    assert_eq!(*retriever.requested.lock().unwrap(), vec![1]);
    assert_eq!(answer.retrieved_docs_count, 1);
    assert_eq!(answer.sources.len(), 1);
    assert!(llm.last_prompt().contains("Collision covers accidents."));
}

#[tokio::test]
async fn test_missing_policy_yields_empty_section() {
    let llm = Arc::new(RecordingLlm::new("ok"));
    let mut assistant = Assistant::new(
        policies(),
        Arc::new(StaticRetriever::new(passages())),
        llm.clone(),
        settings(3),
    );

    let answer = assistant.chat("Is hail covered?", "nobody").await.unwrap();

    assert!(!answer.customer_policy_used);
    assert!(llm
        .last_prompt()
        .contains("CUSTOMER'S SPECIFIC POLICY:\n\n\nGENERAL INSURANCE POLICY INFORMATION:"));
}

#[tokio::test]
async fn test_storage_failure_yields_empty_policy() {
    let assistant = Assistant::new(
        Arc::new(BrokenStore),
        Arc::new(StaticRetriever::new(Vec::new())),
        Arc::new(RecordingLlm::new("ok")),
        settings(3),
    );

    assert_eq!(assistant.customer_policy("john_doe").await, "");
}

#[tokio::test]
async fn test_retrieval_failure_still_answers() {
    let llm = Arc::new(RecordingLlm::new("Based on your policy, yes."));
    let mut assistant = Assistant::new(policies(), Arc::new(FailingRetriever), llm.clone(), settings(3));

    let answer = assistant.chat("Is hail covered?", "john_doe").await.unwrap();

    assert_eq!(answer.response, "Based on your policy, yes.");
    assert_eq!(answer.retrieved_docs_count, 0);
    assert!(answer.sources.is_empty());
    assert!(llm
        .last_prompt()
        .contains("GENERAL INSURANCE POLICY INFORMATION:\n\n\nCUSTOMER QUESTION:"));
}

#[tokio::test]
async fn test_generation_failure_returns_apology() {
    let mut assistant = Assistant::new(
        policies(),
        Arc::new(StaticRetriever::new(passages())),
        Arc::new(FailingLlm),
        settings(3),
    );

    let answer = assistant.chat("Is hail covered?", "john_doe").await.unwrap();

    assert_eq!(answer.response, APOLOGY_RESPONSE);
    assert!(answer.generation_failed);
    assert_eq!(assistant.history().len(), 1);
    assert_eq!(assistant.history().turns()[0].response, APOLOGY_RESPONSE);
}

#[tokio::test]
async fn test_blank_query_rejected_without_history() {
    let mut assistant = Assistant::new(
        policies(),
        Arc::new(StaticRetriever::new(passages())),
        Arc::new(RecordingLlm::new("ok")),
        settings(3),
    );

    let result = assistant.chat("   ", "john_doe").await;

    match result {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Query is required"),
        other => panic!("expected validation error, got {:?}", other.map(|a| a.response)),
    }
    assert!(assistant.history().is_empty());
}

#[tokio::test]
async fn test_history_grows_and_clears() {
    let mut assistant = Assistant::new(
        policies(),
        Arc::new(StaticRetriever::new(passages())),
        Arc::new(RecordingLlm::new("ok")),
        settings(2),
    );

    assistant.chat("first question", "john_doe").await.unwrap();
    assistant.chat("second question", "jane_smith").await.unwrap();

    let history = assistant.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history.turns()[0].query, "first question");
    let last = history.last().unwrap();
    assert_eq!(last.customer_id, "jane_smith");
    assert_eq!(last.sources.len(), 2);

    assistant.clear_history();
    assert!(assistant.history().is_empty());
}
