//! OpenAI-compatible wire format.
//!
//! Works with OpenAI, LiteLLM, vLLM, Compute3, Venice, and other compatible APIs.

use serde_json::{Value, json};

use super::provider::{CONTENT_TYPE_JSON, ProviderAdapter, ProviderDescriptor};
use super::types::{Message, OutboundRequest};

const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f64 = 0.7;

/// Adapter for `/chat/completions` style backends.
pub struct OpenAICompatibleAdapter;

impl ProviderAdapter for OpenAICompatibleAdapter {
    fn build_request(
        &self,
        descriptor: &ProviderDescriptor,
        conversation: &[Message],
    ) -> OutboundRequest {
        let api_key = descriptor.api_key.as_deref().unwrap_or_default();

        OutboundRequest {
            url: format!("{}/chat/completions", descriptor.base_url),
            headers: vec![
                (CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string()),
                ("Authorization".to_string(), format!("Bearer {api_key}")),
            ],
            body: json!({
                "model": descriptor.model,
                "messages": conversation,
                "max_tokens": MAX_TOKENS,
                "temperature": TEMPERATURE,
            }),
        }
    }

    fn extract_reply(&self, body: &Value) -> String {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}
