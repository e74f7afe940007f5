//! Provider table and active-provider resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::provider::{Provider, ProviderDescriptor};

/// Environment key selecting the active provider.
pub const PROVIDER_ENV: &str = "LLM_PROVIDER";

/// Descriptors for every known provider, plus the one selected for this process.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<Provider, Arc<ProviderDescriptor>>,
    selected: String,
    active: Option<Arc<ProviderDescriptor>>,
}

impl ProviderRegistry {
    /// Initialize providers from environment variables.
    pub fn from_env(selector: Option<String>) -> Self {
        Self::from_lookup(selector, |key| std::env::var(key).ok())
    }

    /// Initialize providers by reading configuration keys through `lookup`.
    ///
    /// `selector` takes precedence over the `LLM_PROVIDER` key.
    pub fn from_lookup<F>(selector: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let providers: HashMap<_, _> = Provider::ALL
            .into_iter()
            .map(|p| (p, Arc::new(ProviderDescriptor::resolve(p, &lookup))))
            .collect();

        let selected = selector
            .or_else(|| lookup(PROVIDER_ENV))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Provider::DEFAULT.to_string());

        let active = selected
            .parse::<Provider>()
            .ok()
            .and_then(|p| providers.get(&p).cloned());

        match &active {
            Some(descriptor) if descriptor.is_configured() => {
                info!(
                    provider = %descriptor.provider,
                    model = %descriptor.model,
                    "Registered active LLM provider"
                );
            }
            Some(descriptor) => {
                warn!(
                    provider = %descriptor.provider,
                    key = descriptor.api_key_env().unwrap_or_default(),
                    "Active LLM provider has no API key; chat requests will fail"
                );
            }
            None => {
                error!(provider = %selected, "Unknown provider");
            }
        }

        Self {
            providers,
            selected,
            active,
        }
    }

    /// Registry holding one pre-built descriptor, selected as active.
    pub fn single(descriptor: ProviderDescriptor) -> Self {
        let selected = descriptor.provider.to_string();
        let descriptor = Arc::new(descriptor);
        let providers = HashMap::from([(descriptor.provider, descriptor.clone())]);
        Self {
            providers,
            selected,
            active: Some(descriptor),
        }
    }

    /// Look up a provider by its configuration name.
    pub fn resolve(&self, name: &str) -> Option<Arc<ProviderDescriptor>> {
        let provider = name.parse::<Provider>().ok()?;
        self.providers.get(&provider).cloned()
    }

    /// The provider selected for this process, if the selector names a known one.
    ///
    /// Resolved once at construction.
    pub fn active(&self) -> Option<Arc<ProviderDescriptor>> {
        self.active.clone()
    }

    /// The raw selector value, known or not.
    pub fn selected(&self) -> &str {
        &self.selected
    }
}
