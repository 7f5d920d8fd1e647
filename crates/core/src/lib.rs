//! Policyguide Core Library
//!
//! This crate provides the foundational utilities for the policyguide assistant:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (AWS identifiers, retrieval and ingestion settings)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
