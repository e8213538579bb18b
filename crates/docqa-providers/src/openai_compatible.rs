//! Unified OpenAI-compatible provider.
//!
//! One struct handles chat completions for every registered provider.
//! Providers are distinguished only by endpoint URL and API key.

use async_trait::async_trait;
use docqa_core::config::ProviderSettings;
use docqa_core::error::{DocQaError, Result};
use docqa_core::traits::provider::{ChatProvider, GenerateParams};
use docqa_core::types::Message;
use serde_json::{Value, json};
use std::time::Duration;

use crate::provider_registry::ProviderConfig;

/// Upper bound for one completion request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A provider that works with any OpenAI-compatible API.
pub struct OpenAiCompatibleProvider {
    /// Provider name (e.g., "deepseek", "kimi").
    name: String,
    /// Base URL for the API (e.g., "https://api.deepseek.com/v1").
    base_url: String,
    /// Path for chat completions (e.g., "/chat/completions").
    chat_path: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create from a registry entry. A non-empty `settings.endpoint`
    /// overrides the registry base URL.
    pub fn from_registry(registry: &ProviderConfig, settings: &ProviderSettings) -> Result<Self> {
        let base_url = if settings.endpoint.is_empty() {
            registry.base_url.to_string()
        } else {
            settings.endpoint.trim_end_matches('/').to_string()
        };
        Self::new(registry.name, &base_url, registry.chat_path)
    }

    pub fn new(name: &str, base_url: &str, chat_path: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DocQaError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            chat_path: chat_path.to_string(),
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, self.chat_path)
    }
}

/// Build the request body in the standard OpenAI format.
pub fn request_body(messages: &[Message], params: &GenerateParams) -> Value {
    json!({
        "model": params.model,
        "messages": messages,
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
        "top_p": params.top_p,
        "stream": false,
    })
}

/// Extract `choices[0].message.content` from a completion response.
pub fn parse_response(provider: &str, json: &Value) -> Result<String> {
    let choice = json["choices"]
        .get(0)
        .ok_or_else(|| DocQaError::Provider(format!("{provider}: no choices in response")))?;
    choice["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| DocQaError::Provider(format!("{provider}: empty message content")))
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        api_key: &str,
        messages: &[Message],
        params: &GenerateParams,
    ) -> Result<String> {
        if api_key.is_empty() {
            return Err(DocQaError::ApiKeyMissing(self.name.clone()));
        }

        let url = self.url();
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request_body(messages, params))
            .send()
            .await
            .map_err(|e| {
                DocQaError::Http(format!("{} connection failed ({}): {}", self.name, url, e))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DocQaError::Provider(format!(
                "{} API error {}: {}",
                self.name, status, text
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| DocQaError::Http(format!("{} invalid response: {}", self.name, e)))?;
        parse_response(&self.name, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider_registry::get_provider_config;

    #[test]
    fn test_request_body() {
        let params = GenerateParams {
            model: "deepseek-chat".into(),
            temperature: 0.0,
            max_tokens: 2000,
            top_p: 1.0,
        };
        let body = request_body(&[Message::system("rules"), Message::user("q")], &params);
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "q");
    }

    #[test]
    fn test_parse_response() {
        let json = json!({"choices": [{"message": {"role": "assistant", "content": "answer"}}]});
        assert_eq!(parse_response("kimi", &json).unwrap(), "answer");

        let empty = json!({"choices": []});
        assert!(matches!(parse_response("kimi", &empty), Err(DocQaError::Provider(_))));

        let null_content = json!({"choices": [{"message": {"content": null}}]});
        assert!(parse_response("kimi", &null_content).is_err());
    }

    #[test]
    fn test_endpoint_override() {
        let registry = get_provider_config("kimi").unwrap();
        let default = OpenAiCompatibleProvider::from_registry(registry, &ProviderSettings::default())
            .unwrap();
        assert_eq!(default.url(), "https://api.moonshot.cn/v1/chat/completions");

        let settings = ProviderSettings {
            endpoint: "http://localhost:9000/v1/".into(),
            ..Default::default()
        };
        let custom = OpenAiCompatibleProvider::from_registry(registry, &settings).unwrap();
        assert_eq!(custom.url(), "http://localhost:9000/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_missing_key_rejected_without_request() {
        let provider = OpenAiCompatibleProvider::new("deepseek", "http://127.0.0.1:9", "/chat/completions")
            .unwrap();
        let err = provider
            .complete("", &[Message::user("hi")], &GenerateParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DocQaError::ApiKeyMissing(name) if name == "deepseek"));
    }
}
