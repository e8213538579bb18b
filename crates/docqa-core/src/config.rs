//! DocQA configuration system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{DocQaError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocQaConfig {
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl DocQaConfig {
    /// Load config from the default path (~/.docqa/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load config from a specific path, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocQaError::Config(format!("Failed to read config: {e}")))?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| DocQaError::Config(format!("Failed to parse config: {e}")))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the DocQA home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docqa")
    }

    /// Override numeric settings from `CHUNK_SIZE`, `CHUNK_OVERLAP`,
    /// `MAX_FILE_SIZE` and `TOP_K`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| -> Option<usize> {
            let raw = lookup(key)?;
            match raw.trim().parse::<usize>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("⚠️ Ignoring {key}={raw:?}: not a non-negative integer");
                    None
                }
            }
        };

        if let Some(v) = read("CHUNK_SIZE") {
            self.documents.chunk_size = v;
        }
        if let Some(v) = read("CHUNK_OVERLAP") {
            self.documents.chunk_overlap = v;
        }
        if let Some(v) = read("MAX_FILE_SIZE") {
            self.documents.max_file_size_mb = v;
        }
        if let Some(v) = read("TOP_K") {
            self.retrieval.top_k = v;
        }
    }

    /// Reject settings that would make retrieval meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.documents.chunk_size == 0 {
            return Err(DocQaError::Config("documents.chunk_size must be > 0".into()));
        }
        if self.documents.chunk_overlap >= self.documents.chunk_size {
            return Err(DocQaError::Config(format!(
                "documents.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.documents.chunk_overlap, self.documents.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(DocQaError::Config("retrieval.top_k must be > 0".into()));
        }
        Ok(())
    }

    /// Copy of this config with every api key replaced by a mask, for display.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        for settings in copy.providers.entries.values_mut() {
            if !settings.api_key.is_empty() {
                settings.api_key = "****".into();
            }
        }
        copy
    }
}

/// Document intake and chunking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: usize,
    #[serde(default = "default_supported_types")]
    pub supported_types: Vec<String>,
}

fn default_chunk_size() -> usize { 1000 }
fn default_chunk_overlap() -> usize { 200 }
fn default_max_file_size_mb() -> usize { 10 }
fn default_supported_types() -> Vec<String> {
    vec!["txt", "md", "pdf", "docx"]
        .into_iter().map(String::from).collect()
}

impl DocumentsConfig {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            max_file_size_mb: default_max_file_size_mb(),
            supported_types: default_supported_types(),
        }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Number of trailing history entries forwarded to the provider.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_top_k() -> usize { 10 }
fn default_history_window() -> usize { 4 }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            history_window: default_history_window(),
        }
    }
}

/// Generation parameters applied to every provider call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_temperature() -> f32 { 0.0 }
fn default_max_tokens() -> u32 { 2000 }
fn default_top_p() -> f32 { 1.0 }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// Provider preference and per-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_provider_order")]
    pub default_order: Vec<String>,
    /// `[providers.<id>]` tables.
    #[serde(flatten, default)]
    pub entries: BTreeMap<String, ProviderSettings>,
}

fn default_provider_order() -> Vec<String> {
    vec!["deepseek".into(), "kimi".into()]
}

impl ProvidersConfig {
    /// Settings for one provider, or empty settings if none are configured.
    pub fn settings(&self, id: &str) -> ProviderSettings {
        self.entries.get(id).cloned().unwrap_or_default()
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default_order: default_provider_order(),
            entries: BTreeMap::new(),
        }
    }
}

/// Settings for a single provider. Empty strings mean "use the registry default".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub endpoint: String,
}

/// Conversation history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum retained user/assistant pairs.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_max_history() -> usize { 20 }

impl Default for ConversationConfig {
    fn default() -> Self {
        Self { max_history: default_max_history() }
    }
}
