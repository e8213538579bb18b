//! # DocQA Providers
//!
//! Chat-completion providers for DocQA.
//!
//! Every supported provider (DeepSeek, Kimi) is OpenAI-compatible and is
//! served by a single `OpenAiCompatibleProvider`. `FailoverChain` orders
//! them by preference and fails over sequentially.

pub mod failover;
pub mod openai_compatible;
pub mod provider_registry;

use docqa_core::config::DocQaConfig;
use docqa_core::error::{DocQaError, Result};
use std::sync::Arc;

pub use failover::{Completion, FailoverChain, ProviderSlot, provider_order};

/// Build the failover chain from `config.providers.default_order`.
///
/// Resolution per provider:
/// - API key: `[providers.<id>].api_key` > registry env vars > absent
/// - Model: `[providers.<id>].model` > registry default
/// - Base URL: `[providers.<id>].endpoint` > registry default
pub fn create_chain(config: &DocQaConfig) -> Result<FailoverChain> {
    let mut slots: Vec<ProviderSlot> = Vec::new();

    for name in &config.providers.default_order {
        let registry = provider_registry::get_provider_config(name)
            .ok_or_else(|| DocQaError::ProviderNotFound(name.clone()))?;
        if slots.iter().any(|s| s.id == registry.name) {
            continue;
        }

        let settings = config.providers.settings(registry.name);
        let model = if settings.model.is_empty() {
            registry.default_model.to_string()
        } else {
            settings.model.clone()
        };

        let configured_key = settings.api_key.clone();
        let env_keys = registry.env_keys;
        let credential: failover::CredentialFn = Box::new(move || {
            if !configured_key.trim().is_empty() {
                return Some(configured_key.clone());
            }
            env_keys.iter().find_map(|key| {
                std::env::var(key).ok().filter(|v| !v.trim().is_empty())
            })
        });

        let provider = openai_compatible::OpenAiCompatibleProvider::from_registry(registry, &settings)?;
        slots.push(ProviderSlot::new(
            registry.name,
            registry.display_name,
            &model,
            credential,
            Arc::new(provider),
        ));
    }

    if slots.is_empty() {
        return Err(DocQaError::Config("providers.default_order is empty".into()));
    }
    Ok(FailoverChain::new(slots, config.generation.clone()))
}

/// Registered providers that `config.providers.default_order` leaves out.
pub fn unused_providers(config: &DocQaConfig) -> Vec<&'static str> {
    let listed: Vec<String> = config
        .providers
        .default_order
        .iter()
        .map(|n| provider_registry::canonical_name(n))
        .collect();
    provider_registry::all_provider_names()
        .into_iter()
        .filter(|name| !listed.iter().any(|l| l == name))
        .collect()
}
