//! Amazon Bedrock LLM provider implementation.
//!
//! Calls `InvokeModel` with the Anthropic messages body. Bedrock API:
//! https://docs.aws.amazon.com/bedrock/latest/APIReference/API_runtime_InvokeModel.html

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use policyguide_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Body schema version required by Anthropic models on Bedrock.
const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Anthropic messages request body.
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Anthropic messages response body.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

/// Bedrock runtime LLM client.
pub struct BedrockClient {
    client: Client,
}

impl BedrockClient {
    /// Create a client from shared AWS configuration.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(Client::new(sdk_config))
    }

    /// Wrap an existing Bedrock runtime client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Serialize an LlmRequest as an Anthropic messages body.
    fn to_request_body(request: &LlmRequest) -> AppResult<Vec<u8>> {
        let body = AnthropicRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: request.max_tokens_or_default(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        };

        Ok(serde_json::to_vec(&body)?)
    }

    /// Convert an Anthropic response body to LlmResponse.
    fn convert_response(bytes: &[u8], requested_model: &str) -> AppResult<LlmResponse> {
        let response: AnthropicResponse = serde_json::from_slice(bytes)
            .map_err(|e| AppError::Llm(format!("Failed to parse Bedrock response: {}", e)))?;

        let content = response
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if content.trim().is_empty() {
            return Err(AppError::Llm(
                "Bedrock response contained no text content".to_string(),
            ));
        }

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.input_tokens, u.output_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response
                .model
                .unwrap_or_else(|| requested_model.to_string()),
            usage,
            stop_reason: response.stop_reason,
        })
    }
}

/// Accepts both required and optional SDK members.
fn present<T>(member: impl Into<Option<T>>) -> Option<T> {
    member.into()
}

#[async_trait::async_trait]
impl LlmClient for BedrockClient {
    fn provider_name(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, "Sending completion request to Bedrock");
        tracing::debug!("Prompt length: {} chars", request.prompt.len());

        let body = Self::to_request_body(request)?;

        let output = self
            .client
            .invoke_model()
            .model_id(&request.model)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!(
                    "Bedrock InvokeModel failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let blob = present::<Blob>(output.body)
            .ok_or_else(|| AppError::Llm("Bedrock response had no body".to_string()))?;

        let response = Self::convert_response(blob.as_ref(), &request.model)?;

        tracing::info!(
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Received completion from Bedrock"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = LlmRequest::new("What is covered?", "model-x").with_temperature(0.3);
        let bytes = BedrockClient::to_request_body(&request).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "What is covered?");
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_some());
    }

    #[test]
    fn test_convert_response_joins_text_blocks() {
        let body = serde_json::json!({
            "model": "claude-test",
            "content": [
                {"type": "text", "text": "Your deductible "},
                {"type": "text", "text": "is $500."}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 40, "output_tokens": 8}
        });
        let bytes = serde_json::to_vec(&body).unwrap();

        let response = BedrockClient::convert_response(&bytes, "fallback").unwrap();
        assert_eq!(response.content, "Your deductible is $500.");
        assert_eq!(response.model, "claude-test");
        assert_eq!(response.usage.total_tokens, 48);
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_convert_response_without_text_is_error() {
        let body = serde_json::json!({"content": []});
        let bytes = serde_json::to_vec(&body).unwrap();
        assert!(BedrockClient::convert_response(&bytes, "m").is_err());
    }

    #[test]
    fn test_convert_response_uses_requested_model() {
        let body = serde_json::json!({"content": [{"type": "text", "text": "ok"}]});
        let bytes = serde_json::to_vec(&body).unwrap();
        let response = BedrockClient::convert_response(&bytes, "requested").unwrap();
        assert_eq!(response.model, "requested");
    }
}
