//! LLM provider abstraction and request/response normalization.

mod anthropic;
mod chat;
mod error;
mod ollama;
mod openai;
mod provider;
mod registry;
mod types;

pub use anthropic::AnthropicAdapter;
pub use chat::{ChatInput, ChatService};
pub use error::ChatError;
pub use ollama::OllamaAdapter;
pub use openai::OpenAICompatibleAdapter;
pub use provider::{
    Provider, ProviderAdapter, ProviderDescriptor, ProviderFamily, ProviderSpec, UnknownProvider,
    adapter_for,
};
pub use registry::{PROVIDER_ENV, ProviderRegistry};
pub use types::{Message, OutboundRequest, Role};
