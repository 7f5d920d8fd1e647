//! Passage retrieval from the knowledge base.
//!
//! Retrieval failures never reach the caller of [`retrieve_or_empty`]: the
//! assistant answers from the customer policy alone when the knowledge base
//! is unavailable.

pub mod bedrock;
pub mod demo;

pub use bedrock::BedrockRetriever;
pub use demo::DemoRetriever;

use crate::types::{RetrievedPassage, DEFAULT_SOURCE_LABEL};
use policyguide_core::config::MAX_RESULTS_LIMIT;
use policyguide_core::AppResult;

/// Semantic search over the general policy corpus.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Up to `max_results` passages, most relevant first.
    async fn retrieve(&self, query: &str, max_results: u32) -> AppResult<Vec<RetrievedPassage>>;
}

/// Retrieve passages, returning an empty list on any failure.
pub async fn retrieve_or_empty(
    retriever: &dyn Retriever,
    query: &str,
    max_results: u32,
) -> Vec<RetrievedPassage> {
    let max_results = clamp_max_results(max_results);

    match retriever.retrieve(query, max_results).await {
        Ok(passages) => {
            tracing::debug!(
                retriever = retriever.name(),
                "Retrieved {} passages",
                passages.len()
            );
            passages
        }
        Err(e) => {
            tracing::warn!(
                retriever = retriever.name(),
                "Retrieval failed, continuing without context: {}",
                e
            );
            Vec::new()
        }
    }
}

/// Keep a result count inside 1..=100.
pub fn clamp_max_results(max_results: u32) -> u32 {
    max_results.clamp(1, MAX_RESULTS_LIMIT)
}

/// Source label for a passage location: the file name of the URI.
pub fn source_label(uri: Option<&str>) -> String {
    uri.map(|u| u.trim_end_matches('/'))
        .and_then(|u| u.rsplit('/').next())
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use policyguide_core::AppError;

    struct Failing;

    #[async_trait::async_trait]
    impl Retriever for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn retrieve(&self, _query: &str, _max: u32) -> AppResult<Vec<RetrievedPassage>> {
            Err(AppError::Retrieval("service unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failure_yields_empty() {
        let passages = retrieve_or_empty(&Failing, "Is hail covered?", 3).await;
        assert!(passages.is_empty());
    }

    #[tokio::test]
    async fn test_demo_passes_through() {
        let passages = retrieve_or_empty(&DemoRetriever, "Is hail covered?", 3).await;
        assert_eq!(passages.len(), 2);
    }

    #[test]
    fn test_clamp_max_results() {
        assert_eq!(clamp_max_results(0), 1);
        assert_eq!(clamp_max_results(3), 3);
        assert_eq!(clamp_max_results(500), 100);
    }

    #[test]
    fn test_source_label() {
        assert_eq!(
            source_label(Some("s3://policy-bucket/policy_docs/auto-policy.pdf")),
            "auto-policy.pdf"
        );
        assert_eq!(source_label(Some("s3:")), DEFAULT_SOURCE_LABEL);
        assert_eq!(source_label(None), DEFAULT_SOURCE_LABEL);
    }
}
