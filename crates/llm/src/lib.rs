//! LLM integration crate for the policyguide assistant.
//!
//! Provides a provider-agnostic completion interface over hosted models.
//!
//! # Providers
//! - **Bedrock**: Anthropic models through `InvokeModel`
//! - **Demo**: offline keyword responder
//!
//! # Example
//! ```no_run
//! use policyguide_llm::{create_client, LlmRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_client("demo", None)?;
//! let request = LlmRequest::new("What is my deductible?", "demo");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage, DEFAULT_MAX_TOKENS};
pub use factory::create_client;
pub use providers::{BedrockClient, DemoClient};
pub use types::ProviderType;
