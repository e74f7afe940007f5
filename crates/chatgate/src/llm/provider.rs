//! Provider identifiers, descriptors, and the adapter trait.

use std::fmt;
use std::str::FromStr;

use super::anthropic::AnthropicAdapter;
use super::ollama::OllamaAdapter;
use super::openai::OpenAICompatibleAdapter;
use super::types::{Message, OutboundRequest};

/// Supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    LiteLLM,
    Vllm,
    Compute3,
    Venice,
    OpenAI,
    Anthropic,
    Ollama,
}

impl Provider {
    /// Every provider, in the order they are listed at startup.
    pub const ALL: [Provider; 7] = [
        Provider::LiteLLM,
        Provider::Vllm,
        Provider::Compute3,
        Provider::Venice,
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::Ollama,
    ];

    /// Provider used when no selector is configured.
    pub const DEFAULT: Provider = Provider::LiteLLM;

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::LiteLLM => "litellm",
            Provider::Vllm => "vllm",
            Provider::Compute3 => "compute3",
            Provider::Venice => "venice",
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
        }
    }

    /// Connection parameters and environment keys for this provider.
    pub fn spec(&self) -> &'static ProviderSpec {
        match self {
            Provider::LiteLLM => &LITELLM,
            Provider::Vllm => &VLLM,
            Provider::Compute3 => &COMPUTE3,
            Provider::Venice => &VENICE,
            Provider::OpenAI => &OPENAI,
            Provider::Anthropic => &ANTHROPIC,
            Provider::Ollama => &OLLAMA,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Wire protocol family a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderFamily {
    OpenAICompatible,
    AnthropicStyle,
    OllamaStyle,
}

impl ProviderFamily {
    pub fn requires_credential(&self) -> bool {
        !matches!(self, ProviderFamily::OllamaStyle)
    }
}

// ============================================================================
// Descriptor table
// ============================================================================

/// Static table row: family, default values, and the environment keys that override them.
#[derive(Debug)]
pub struct ProviderSpec {
    pub family: ProviderFamily,
    /// `None` means the base URL is fixed.
    pub base_url_key: Option<&'static str>,
    pub default_base_url: &'static str,
    /// `None` means the provider takes no credential.
    pub api_key_key: Option<&'static str>,
    pub model_key: &'static str,
    pub default_model: &'static str,
}

impl ProviderSpec {
    /// Environment keys this provider reads, in display order.
    pub fn env_keys(&self) -> Vec<&'static str> {
        self.base_url_key
            .into_iter()
            .chain(self.api_key_key)
            .chain(std::iter::once(self.model_key))
            .collect()
    }
}

static LITELLM: ProviderSpec = ProviderSpec {
    family: ProviderFamily::OpenAICompatible,
    base_url_key: Some("LITELLM_BASE_URL"),
    default_base_url: "http://localhost:4000",
    api_key_key: Some("LITELLM_API_KEY"),
    model_key: "LITELLM_MODEL",
    default_model: "gpt-3.5-turbo",
};

static VLLM: ProviderSpec = ProviderSpec {
    family: ProviderFamily::OpenAICompatible,
    base_url_key: Some("VLLM_BASE_URL"),
    default_base_url: "http://localhost:8000",
    api_key_key: Some("VLLM_API_KEY"),
    model_key: "VLLM_MODEL",
    default_model: "meta-llama/Llama-2-7b-chat-hf",
};

static COMPUTE3: ProviderSpec = ProviderSpec {
    family: ProviderFamily::OpenAICompatible,
    base_url_key: None,
    default_base_url: "https://api.compute3.ai/v1",
    api_key_key: Some("COMPUTE3_API_KEY"),
    model_key: "COMPUTE3_MODEL",
    default_model: "deepseek-v3.1",
};

static VENICE: ProviderSpec = ProviderSpec {
    family: ProviderFamily::OpenAICompatible,
    base_url_key: None,
    default_base_url: "https://api.venice.ai/api/v1",
    api_key_key: Some("VENICE_API_KEY"),
    model_key: "VENICE_MODEL",
    default_model: "llama-3.3-70b",
};

static OPENAI: ProviderSpec = ProviderSpec {
    family: ProviderFamily::OpenAICompatible,
    base_url_key: None,
    default_base_url: "https://api.openai.com/v1",
    api_key_key: Some("OPENAI_API_KEY"),
    model_key: "OPENAI_MODEL",
    default_model: "gpt-4o-mini",
};

static ANTHROPIC: ProviderSpec = ProviderSpec {
    family: ProviderFamily::AnthropicStyle,
    base_url_key: None,
    default_base_url: "https://api.anthropic.com/v1",
    api_key_key: Some("ANTHROPIC_API_KEY"),
    model_key: "ANTHROPIC_MODEL",
    default_model: "claude-3-haiku-20240307",
};

static OLLAMA: ProviderSpec = ProviderSpec {
    family: ProviderFamily::OllamaStyle,
    base_url_key: Some("OLLAMA_BASE_URL"),
    default_base_url: "http://localhost:11434",
    api_key_key: None,
    model_key: "OLLAMA_MODEL",
    default_model: "llama2",
};

// ============================================================================
// ProviderDescriptor
// ============================================================================

/// Resolved connection parameters for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub provider: Provider,
    pub family: ProviderFamily,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl ProviderDescriptor {
    /// Build a descriptor from the provider's table row, reading overrides through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn resolve<F>(provider: Provider, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let spec = provider.spec();
        let read = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let base_url = spec
            .base_url_key
            .and_then(read)
            .unwrap_or_else(|| spec.default_base_url.to_string());
        let api_key = spec.api_key_key.and_then(read);
        let model = read(spec.model_key).unwrap_or_else(|| spec.default_model.to_string());

        Self {
            provider,
            family: spec.family,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    /// Whether the descriptor can be used: a credential is present or none is needed.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() || !self.family.requires_credential()
    }

    /// Environment key holding this provider's credential.
    pub fn api_key_env(&self) -> Option<&'static str> {
        self.provider.spec().api_key_key
    }
}

// ============================================================================
// ProviderAdapter
// ============================================================================

/// Translates between the canonical conversation and one wire protocol family.
pub trait ProviderAdapter: Send + Sync {
    /// Build the backend request for a conversation.
    fn build_request(
        &self,
        descriptor: &ProviderDescriptor,
        conversation: &[Message],
    ) -> OutboundRequest;

    /// Pull the reply text out of a success response body.
    ///
    /// Returns an empty string when the expected field is missing; upstream
    /// response shapes are not guaranteed, so this never fails.
    fn extract_reply(&self, body: &serde_json::Value) -> String;
}

/// Adapter implementing the given family's wire protocol.
pub fn adapter_for(family: ProviderFamily) -> &'static dyn ProviderAdapter {
    match family {
        ProviderFamily::OpenAICompatible => &OpenAICompatibleAdapter,
        ProviderFamily::AnthropicStyle => &AnthropicAdapter,
        ProviderFamily::OllamaStyle => &OllamaAdapter,
    }
}

pub(crate) const CONTENT_TYPE_JSON: (&str, &str) = ("Content-Type", "application/json");
