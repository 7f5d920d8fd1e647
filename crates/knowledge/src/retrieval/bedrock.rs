//! Bedrock Knowledge Base retrieval.
//!
//! Calls the agent runtime `Retrieve` API with a vector search bounded to the
//! requested number of results.

use super::{source_label, Retriever};
use crate::types::RetrievedPassage;
use aws_config::SdkConfig;
use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration, KnowledgeBaseRetrievalResult,
    KnowledgeBaseVectorSearchConfiguration, RetrievalResultLocation,
};
use aws_sdk_bedrockagentruntime::Client;
use policyguide_core::{AppError, AppResult};

/// Retriever for one Bedrock knowledge base.
pub struct BedrockRetriever {
    client: Client,
    knowledge_base_id: String,
}

impl BedrockRetriever {
    pub fn new(sdk_config: &SdkConfig, knowledge_base_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(sdk_config),
            knowledge_base_id: knowledge_base_id.into(),
        }
    }

    /// Query text and vector search settings for one `Retrieve` call.
    fn request_parts(
        query: &str,
        max_results: u32,
    ) -> (KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration) {
        let retrieval_query = KnowledgeBaseQuery::builder().text(query).build();

        let vector_search = KnowledgeBaseVectorSearchConfiguration::builder()
            .number_of_results(max_results as i32)
            .build();

        let configuration = KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(vector_search)
            .build();

        (retrieval_query, configuration)
    }

    fn to_passage(result: KnowledgeBaseRetrievalResult) -> Option<RetrievedPassage> {
        let text = result
            .content
            .and_then(|content| present::<String>(content.text))?;

        let uri = result.location.and_then(s3_uri);

        Some(RetrievedPassage {
            text,
            source: source_label(uri.as_deref()),
            score: result.score.unwrap_or(0.0),
            uri,
        })
    }
}

fn s3_uri(location: RetrievalResultLocation) -> Option<String> {
    location.s3_location.and_then(|s3| s3.uri)
}

/// Accepts both required and optional SDK members.
fn present<T>(member: impl Into<Option<T>>) -> Option<T> {
    member.into()
}

#[async_trait::async_trait]
impl Retriever for BedrockRetriever {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn retrieve(&self, query: &str, max_results: u32) -> AppResult<Vec<RetrievedPassage>> {
        tracing::debug!(
            knowledge_base = %self.knowledge_base_id,
            max_results,
            "Querying knowledge base"
        );

        let (retrieval_query, configuration) = Self::request_parts(query, max_results);

        let output = self
            .client
            .retrieve()
            .knowledge_base_id(&self.knowledge_base_id)
            .retrieval_query(retrieval_query)
            .retrieval_configuration(configuration)
            .send()
            .await
            .map_err(|e| {
                AppError::Retrieval(format!(
                    "Knowledge base retrieve failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let results = present::<Vec<KnowledgeBaseRetrievalResult>>(output.retrieval_results)
            .unwrap_or_default();

        let passages: Vec<RetrievedPassage> =
            results.into_iter().filter_map(Self::to_passage).collect();

        tracing::info!(
            "Retrieved {} passages (top score: {:.3})",
            passages.len(),
            passages.first().map(|p| p.score).unwrap_or(0.0)
        );

        Ok(passages)
    }
}
