//! Command handlers for the policyguide CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod ingest;
pub mod policy;
pub mod upload;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use ingest::IngestCommand;
pub use policy::PolicyCommand;
pub use upload::{UploadCommand, UploadUrlCommand};

use policyguide_core::AppResult;
use policyguide_knowledge::rag::SourceCitation;
use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print citations as an indented list.
pub(crate) fn print_sources(sources: &[SourceCitation]) {
    if sources.is_empty() {
        println!("Sources: (no sources available)");
        return;
    }

    println!("Sources:");
    for source in sources {
        println!("- {} (score {:.2})", source.title, source.score);
        println!("  {}", source.snippet);
    }
}
