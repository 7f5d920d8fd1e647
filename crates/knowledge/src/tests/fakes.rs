//! Test doubles for the external services.

use crate::retrieval::Retriever;
use crate::storage::{ObjectStore, PutObject};
use crate::types::RetrievedPassage;
use policyguide_core::{AppError, AppResult};
use policyguide_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::Mutex;
use std::time::Duration;

/// Returns fixed passages and remembers the requested count.
pub struct StaticRetriever {
    pub passages: Vec<RetrievedPassage>,
    pub requested: Mutex<Vec<u32>>,
}

impl StaticRetriever {
    pub fn new(passages: Vec<RetrievedPassage>) -> Self {
        Self {
            passages,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Retriever for StaticRetriever {
    fn name(&self) -> &str {
        "static"
    }

    async fn retrieve(&self, _query: &str, max_results: u32) -> AppResult<Vec<RetrievedPassage>> {
        self.requested.lock().unwrap().push(max_results);
        Ok(self.passages.iter().take(max_results as usize).cloned().collect())
    }
}

pub struct FailingRetriever;

#[async_trait::async_trait]
impl Retriever for FailingRetriever {
    fn name(&self) -> &str {
        "failing"
    }

    async fn retrieve(&self, _query: &str, _max: u32) -> AppResult<Vec<RetrievedPassage>> {
        Err(AppError::Retrieval("AccessDeniedException".to_string()))
    }
}

/// Echoes a fixed answer and records every prompt.
pub struct RecordingLlm {
    pub answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingLlm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlm {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        Ok(LlmResponse {
            content: self.answer.clone(),
            model: request.model.clone(),
            usage: LlmUsage::new(10, 5),
            stop_reason: None,
        })
    }
}

pub struct FailingLlm;

#[async_trait::async_trait]
impl LlmClient for FailingLlm {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(AppError::Llm("ThrottlingException".to_string()))
    }
}

/// Store whose every call fails.
pub struct BrokenStore;

#[async_trait::async_trait]
impl ObjectStore for BrokenStore {
    fn bucket(&self) -> &str {
        "broken"
    }

    async fn get_text(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::Storage("connection reset".to_string()))
    }

    async fn put_object(&self, _object: PutObject) -> AppResult<()> {
        Err(AppError::Storage("connection reset".to_string()))
    }

    async fn presign_put(&self, _key: &str, _ct: &str, _exp: Duration) -> AppResult<String> {
        Err(AppError::Storage("connection reset".to_string()))
    }
}
