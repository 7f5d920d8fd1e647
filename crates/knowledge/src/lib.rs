//! Knowledge and answering services for the policyguide assistant.
//!
//! Storage, vector search and indexing are delegated to managed services
//! (S3 and Bedrock Knowledge Bases). This crate holds the typed clients for
//! them, the ingestion poller and uploader, and the RAG orchestrator that
//! ties customer policies, retrieved passages and the model together.

pub mod backend;
pub mod document;
pub mod ingest;
pub mod keys;
pub mod progress;
pub mod rag;
pub mod retrieval;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use backend::{Backends, DEMO_CUSTOMERS};
pub use ingest::{IngestionService, PollOptions};
pub use progress::{ProgressEvent, ProgressReporter};
pub use rag::{Assistant, AssistantSettings, ChatAnswer, ConversationHistory, SourceCitation};
pub use retrieval::Retriever;
pub use storage::{MemoryStore, ObjectStore, PutObject};
pub use types::{
    IngestionJob, IngestionStatus, RetrievedPassage, UploadReceipt, UploadStats,
};
