//! Provider registry: maps provider names to endpoint configurations.
//!
//! Both supported providers speak the OpenAI chat-completions protocol and
//! differ only by endpoint, credential env vars and default model.

/// Configuration for a single provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier.
    pub name: &'static str,
    /// Human-readable name reported as `model_used`.
    pub display_name: &'static str,
    /// Base URL for the API.
    pub base_url: &'static str,
    /// Path for chat completions endpoint (appended to base_url).
    pub chat_path: &'static str,
    /// Environment variable names to try for the API key (in order).
    pub env_keys: &'static [&'static str],
    /// Model id used when config does not name one.
    pub default_model: &'static str,
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// All known providers.
static PROVIDERS: &[ProviderConfig] = &[
    ProviderConfig {
        name: "deepseek",
        display_name: "DeepSeek",
        base_url: "https://api.deepseek.com/v1",
        chat_path: "/chat/completions",
        env_keys: &["DEEPSEEK_API_KEY"],
        default_model: "deepseek-chat",
    },
    ProviderConfig {
        name: "kimi",
        display_name: "Kimi",
        base_url: "https://api.moonshot.cn/v1",
        chat_path: "/chat/completions",
        env_keys: &["KIMI_API_KEY", "MOONSHOT_API_KEY"],
        default_model: "moonshot-v1-8k",
    },
];

/// Resolve aliases to the canonical provider name.
pub fn canonical_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "moonshot" => "kimi".to_string(),
        "deepseek-chat" => "deepseek".to_string(),
        _ => lower,
    }
}

/// Look up a provider config by name (aliases accepted).
pub fn get_provider_config(name: &str) -> Option<&'static ProviderConfig> {
    let lookup = canonical_name(name);
    PROVIDERS.iter().find(|p| p.name == lookup)
}

/// List all known provider names.
pub fn all_provider_names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_aliases() {
        assert_eq!(get_provider_config("deepseek").unwrap().display_name, "DeepSeek");
        assert_eq!(get_provider_config("Moonshot").unwrap().name, "kimi");
        assert!(get_provider_config("gpt-9").is_none());
    }

    #[test]
    fn test_all_provider_names() {
        assert_eq!(all_provider_names(), vec!["deepseek", "kimi"]);
    }
}
