//! Anthropic Messages API wire format.

use serde_json::{Value, json};

use super::provider::{CONTENT_TYPE_JSON, ProviderAdapter, ProviderDescriptor};
use super::types::{Message, OutboundRequest, Role};

/// Adapter for the Anthropic Messages API.
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    pub const API_VERSION: &'static str = "2023-06-01";
    const MAX_TOKENS: u32 = 1024;
}

impl ProviderAdapter for AnthropicAdapter {
    fn build_request(
        &self,
        descriptor: &ProviderDescriptor,
        conversation: &[Message],
    ) -> OutboundRequest {
        // Anthropic wants the system prompt as a separate field
        let (system, messages): (Vec<&Message>, Vec<&Message>) =
            conversation.iter().partition(|m| m.role == Role::System);
        let system = system
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        OutboundRequest {
            url: format!("{}/messages", descriptor.base_url),
            headers: vec![
                (CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string()),
                (
                    "x-api-key".to_string(),
                    descriptor.api_key.clone().unwrap_or_default(),
                ),
                ("anthropic-version".to_string(), Self::API_VERSION.to_string()),
            ],
            body: json!({
                "model": descriptor.model,
                "max_tokens": Self::MAX_TOKENS,
                "system": system,
                "messages": messages,
            }),
        }
    }

    fn extract_reply(&self, body: &Value) -> String {
        body.pointer("/content/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}
