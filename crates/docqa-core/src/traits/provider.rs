//! Chat-completion provider contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Message;

/// Generation parameters sent with every completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.0,
            max_tokens: 2000,
            top_p: 1.0,
        }
    }
}

/// A chat-completion backend reachable through a uniform invoke call.
///
/// The credential is passed per call so that availability can be decided
/// by the caller before the provider is invoked.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Stable provider identifier (e.g. "deepseek").
    fn name(&self) -> &str;

    /// Generate a completion for `messages`, returning the generated text.
    async fn complete(
        &self,
        api_key: &str,
        messages: &[Message],
        params: &GenerateParams,
    ) -> Result<String>;
}
