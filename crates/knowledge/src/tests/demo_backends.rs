//! Demo backend wiring.

use crate::backend::Backends;
use crate::ingest::{run_ingestion, upload_customer_policy, upload_policy_documents, PollOptions};
use crate::progress::ProgressReporter;
use crate::types::IngestionStatus;
use policyguide_core::AppConfig;
use std::time::Duration;
use tempfile::TempDir;

fn demo_config(workspace: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.workspace = workspace.to_path_buf();
    config.provider = "demo".to_string();
    config
}

#[tokio::test]
async fn test_demo_assistant_answers_from_seeded_policy() {
    let temp = TempDir::new().unwrap();
    let backends = Backends::from_config(&demo_config(temp.path())).await.unwrap();
    assert!(backends.is_demo());

    let mut assistant = backends.assistant().unwrap();
    let answer = assistant
        .chat("What is my deductible?", "jane_smith")
        .await
        .unwrap();

    assert!(answer.response.contains("$250"));
    assert!(answer.customer_policy_used);
    assert_eq!(answer.retrieved_docs_count, 2);
    assert_eq!(answer.model_used, "demo");

    let answer = assistant
        .chat("Is rental car covered?", "jane_smith")
        .await
        .unwrap();
    assert!(answer.response.contains("up to $50 per day"));
}

#[tokio::test]
async fn test_demo_upload_visible_to_assistant() {
    let temp = TempDir::new().unwrap();
    let backends = Backends::demo(&demo_config(temp.path()));

    let store = backends.customer_policies().unwrap();
    upload_customer_policy(store.as_ref(), "alex", "policy.txt", b"Deductible: $1,000")
        .await
        .unwrap();

    let mut assistant = backends.assistant().unwrap();
    let answer = assistant.chat("How much is my deductible?", "alex").await.unwrap();
    assert!(answer.response.contains("$1,000"));
}

#[tokio::test]
async fn test_demo_ingestion_completes() {
    let temp = TempDir::new().unwrap();
    let docs = temp.path().join("policy_docs");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("auto.pdf"), b"%PDF-1.4").unwrap();

    let backends = Backends::demo(&demo_config(temp.path()));
    let store = backends.policy_documents().unwrap();
    let stats = upload_policy_documents(store.as_ref(), &docs, &ProgressReporter::noop())
        .await
        .unwrap();
    assert_eq!(stats.uploaded[0].key, "policy_docs/auto.pdf");

    let ingestion = backends.ingestion().unwrap();
    let options = PollOptions::default().with_interval(Duration::from_millis(1));
    let job = run_ingestion(ingestion.as_ref(), None, &options, &ProgressReporter::noop())
        .await
        .unwrap();
    assert_eq!(job.status, IngestionStatus::Complete);
}
