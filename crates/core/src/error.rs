//! Error types for the policyguide assistant.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, object storage, retrieval,
//! generation, prompt composition and ingestion.

use thiserror::Error;

/// Unified error type for the policyguide assistant.
///
/// All fallible functions return `Result<T, AppError>`. The query path is the
/// one place where external failures are absorbed instead of propagated: see
/// `policyguide_knowledge::rag`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Object storage errors (customer policies, uploads)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Knowledge base retrieval errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Hosted model errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Ingestion job errors
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_prefixes() {
        let err = AppError::Storage("bucket not set".to_string());
        assert_eq!(err.to_string(), "Storage error: bucket not set");

        let err = AppError::Validation("Query is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: Query is required");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
