//! End-to-end chat orchestration against the active provider.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::error::ChatError;
use super::provider::adapter_for;
use super::registry::ProviderRegistry;
use super::types::{Message, OutboundRequest};
use crate::prompt::{assemble, build_system_prompt};

/// A single chat call as supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
    pub soul: Option<String>,
    pub identity: Option<String>,
    pub history: Vec<Message>,
}

/// A `null` message is treated like a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Stateless chat front end over the provider registry.
///
/// Cheap to clone; every call makes exactly one outbound request.
#[derive(Clone)]
pub struct ChatService {
    client: Client,
    registry: Arc<ProviderRegistry>,
}

impl ChatService {
    /// Create a service whose outbound calls give up after `upstream_timeout`.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        upstream_timeout: Duration,
    ) -> Result<Self, ChatError> {
        let client = Client::builder().timeout(upstream_timeout).build()?;
        Ok(Self { client, registry })
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Send the caller's message to the active provider and return its reply.
    ///
    /// The reply may be empty if the backend answered successfully with an
    /// unexpected body shape.
    pub async fn chat(&self, input: ChatInput) -> Result<String, ChatError> {
        if input.message.is_empty() {
            return Err(ChatError::Validation("Message is required".to_string()));
        }

        let Some(descriptor) = self.registry.active() else {
            return Err(ChatError::Configuration(
                "No LLM provider configured".to_string(),
            ));
        };

        if !descriptor.is_configured() {
            return Err(ChatError::Configuration(format!(
                "No API key configured for {}. Set {} environment variable.",
                descriptor.provider,
                descriptor.api_key_env().unwrap_or_default()
            )));
        }

        let system_prompt = build_system_prompt(input.soul.as_deref(), input.identity.as_deref());
        let conversation = assemble(&system_prompt, &input.history, &input.message)?;

        let adapter = adapter_for(descriptor.family);
        let request = adapter.build_request(&descriptor, &conversation);

        debug!(provider = %descriptor.provider, url = %request.url, "Calling LLM API");
        let body = self.dispatch(request).await?;

        Ok(adapter.extract_reply(&body))
    }

    async fn dispatch(&self, request: OutboundRequest) -> Result<Value, ChatError> {
        let mut req = self.client.post(&request.url);
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }

        let response = req.json(&request.body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream { status, body });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!(error = %e, "LLM response body is not JSON; treating reply as empty");
            Value::Null
        }))
    }
}
