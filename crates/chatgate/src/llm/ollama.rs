//! Ollama native chat API wire format.

use serde_json::{Value, json};

use super::provider::{CONTENT_TYPE_JSON, ProviderAdapter, ProviderDescriptor};
use super::types::{Message, OutboundRequest};

/// Adapter for Ollama's `/api/chat`. Sends no credential.
pub struct OllamaAdapter;

impl ProviderAdapter for OllamaAdapter {
    fn build_request(
        &self,
        descriptor: &ProviderDescriptor,
        conversation: &[Message],
    ) -> OutboundRequest {
        OutboundRequest {
            url: format!("{}/api/chat", descriptor.base_url),
            headers: vec![(CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string())],
            body: json!({
                "model": descriptor.model,
                "messages": conversation,
                "stream": false,
            }),
        }
    }

    fn extract_reply(&self, body: &Value) -> String {
        body.pointer("/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}
