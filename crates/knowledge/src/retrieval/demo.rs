//! Canned retrieval for offline demo mode.

use super::Retriever;
use crate::types::RetrievedPassage;
use policyguide_core::AppResult;

/// Returns the same two passages for every query.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoRetriever;

#[async_trait::async_trait]
impl Retriever for DemoRetriever {
    fn name(&self) -> &str {
        "demo"
    }

    async fn retrieve(&self, query: &str, max_results: u32) -> AppResult<Vec<RetrievedPassage>> {
        let passages = vec![
            RetrievedPassage::new(
                format!(
                    "Demo result for query: {}. This would contain relevant insurance policy information.",
                    query
                ),
                "Demo Policy Document",
                0.95,
            ),
            RetrievedPassage::new(
                "Coverage includes comprehensive and collision protection with a $500 deductible.",
                "Coverage Details",
                0.87,
            ),
        ];

        Ok(passages.into_iter().take(max_results as usize).collect())
    }
}
