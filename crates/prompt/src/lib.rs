//! Prompt system for the policyguide assistant.
//!
//! This crate composes the grounding prompt sent to the hosted model:
//! - Built-in insurance assistant template
//! - Optional YAML overrides in `.policyguide/prompts/`
//! - Handlebars rendering of policy, retrieved context and question

pub mod builder;
pub mod loader;
pub mod templates;
pub mod types;

// Re-export main types
pub use builder::{build_context, build_prompt, PromptInputs};
pub use loader::{list_prompts, load_prompt};
pub use templates::{default_definition, DEFAULT_PROMPT_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
