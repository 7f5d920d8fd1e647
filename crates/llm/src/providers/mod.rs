//! Hosted model providers.

pub mod bedrock;
pub mod demo;

pub use bedrock::BedrockClient;
pub use demo::DemoClient;
