//! Provider failover: ordered chain with preference reordering.
//!
//! Try preferred → remaining providers in default order. A provider with
//! no credential is skipped silently; a failing provider is logged and the
//! next one is tried. Calls are sequential, with no retries per provider.

use docqa_core::config::GenerationConfig;
use docqa_core::error::{DocQaError, Result};
use docqa_core::traits::provider::{ChatProvider, GenerateParams};
use docqa_core::types::Message;
use std::sync::Arc;

use crate::provider_registry::canonical_name;

/// Reads a provider credential at call time.
pub type CredentialFn = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// One entry of the chain: who it is, how to find its key, how to call it.
pub struct ProviderSlot {
    pub id: String,
    pub display_name: String,
    pub model: String,
    credential: CredentialFn,
    provider: Arc<dyn ChatProvider>,
}

impl ProviderSlot {
    pub fn new(
        id: &str,
        display_name: &str,
        model: &str,
        credential: CredentialFn,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            model: model.to_string(),
            credential,
            provider,
        }
    }

    /// Current credential; empty or whitespace-only values count as absent.
    pub fn credential(&self) -> Option<String> {
        (self.credential)().filter(|k| !k.trim().is_empty())
    }
}

/// Order slots for one request: the preferred provider first (when it is
/// known), then the rest in default order. Unknown preferences fall back
/// to the default order.
pub fn provider_order<'a>(slots: &'a [ProviderSlot], preferred: Option<&str>) -> Vec<&'a ProviderSlot> {
    let preferred = preferred.map(canonical_name);
    let first = preferred
        .as_deref()
        .and_then(|p| slots.iter().position(|s| s.id == p));

    match first {
        Some(pos) => std::iter::once(&slots[pos])
            .chain(slots.iter().enumerate().filter(|(i, _)| *i != pos).map(|(_, s)| s))
            .collect(),
        None => slots.iter().collect(),
    }
}

/// A successful completion and which provider produced it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub provider_id: String,
    pub display_name: String,
}

/// Ordered provider chain.
pub struct FailoverChain {
    slots: Vec<ProviderSlot>,
    generation: GenerationConfig,
}

impl FailoverChain {
    pub fn new(slots: Vec<ProviderSlot>, generation: GenerationConfig) -> Self {
        Self { slots, generation }
    }

    /// Number of providers in the chain.
    pub fn chain_len(&self) -> usize {
        self.slots.len()
    }

    /// `(id, display_name, has_credential)` for every provider, in default order.
    pub fn availability(&self) -> Vec<(&str, &str, bool)> {
        self.slots
            .iter()
            .map(|s| (s.id.as_str(), s.display_name.as_str(), s.credential().is_some()))
            .collect()
    }

    fn params_for(&self, slot: &ProviderSlot) -> GenerateParams {
        GenerateParams {
            model: slot.model.clone(),
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
            top_p: self.generation.top_p,
        }
    }

    /// Run `messages` through the chain, returning the first success.
    pub async fn complete(&self, preferred: Option<&str>, messages: &[Message]) -> Result<Completion> {
        let order = provider_order(&self.slots, preferred);
        let mut last_error = None;
        let mut attempted = 0usize;

        for slot in order {
            let Some(api_key) = slot.credential() else {
                tracing::debug!("⏭️ Skipping provider without credential: {}", slot.id);
                continue;
            };

            attempted += 1;
            let params = self.params_for(slot);
            match slot.provider.complete(&api_key, messages, &params).await {
                Ok(text) => {
                    if attempted > 1 {
                        tracing::info!("🔄 Failover: answered by {} after {} failure(s)", slot.id, attempted - 1);
                    } else {
                        tracing::info!("✅ Answered by {} ({})", slot.id, slot.model);
                    }
                    return Ok(Completion {
                        text,
                        provider_id: slot.id.clone(),
                        display_name: slot.display_name.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!("⚠️ Provider {} failed: {}", slot.id, e);
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) => DocQaError::AllProvidersFailed {
                attempted,
                source: Box::new(e),
            },
            None => DocQaError::NoProviderConfigured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call and answers with a fixed outcome.
    struct ScriptedProvider {
        name: String,
        reply: std::result::Result<String, String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn complete(
            &self,
            api_key: &str,
            _messages: &[Message],
            params: &GenerateParams,
        ) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", self.name, api_key, params.model));
            self.reply.clone().map_err(DocQaError::Provider)
        }
    }

    fn slot(
        id: &str,
        key: Option<&str>,
        reply: std::result::Result<&str, &str>,
        calls: &Arc<Mutex<Vec<String>>>,
    ) -> ProviderSlot {
        let key = key.map(String::from);
        ProviderSlot::new(
            id,
            &id.to_uppercase(),
            &format!("{id}-model"),
            Box::new(move || key.clone()),
            Arc::new(ScriptedProvider {
                name: id.to_string(),
                reply: reply.map(String::from).map_err(String::from),
                calls: Arc::clone(calls),
            }),
        )
    }

    fn ids(order: Vec<&ProviderSlot>) -> Vec<&str> {
        order.into_iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_provider_order() {
        let calls = Arc::new(Mutex::new(vec![]));
        let slots = vec![
            slot("deepseek", None, Ok(""), &calls),
            slot("kimi", None, Ok(""), &calls),
        ];
        assert_eq!(ids(provider_order(&slots, None)), vec!["deepseek", "kimi"]);
        assert_eq!(ids(provider_order(&slots, Some("kimi"))), vec!["kimi", "deepseek"]);
        assert_eq!(ids(provider_order(&slots, Some("moonshot"))), vec!["kimi", "deepseek"]);
        assert_eq!(ids(provider_order(&slots, Some("gpt-5"))), vec!["deepseek", "kimi"]);
        assert_eq!(ids(provider_order(&slots, Some(""))), vec!["deepseek", "kimi"]);
    }

    #[tokio::test]
    async fn test_preferred_provider_used_first() {
        let calls = Arc::new(Mutex::new(vec![]));
        let chain = FailoverChain::new(
            vec![
                slot("deepseek", Some("k1"), Ok("from deepseek"), &calls),
                slot("kimi", Some("k2"), Ok("from kimi"), &calls),
            ],
            GenerationConfig::default(),
        );
        let done = chain.complete(Some("kimi"), &[Message::user("q")]).await.unwrap();
        assert_eq!(done.text, "from kimi");
        assert_eq!(done.display_name, "KIMI");
        assert_eq!(*calls.lock().unwrap(), vec!["kimi:k2:kimi-model"]);
    }

    #[tokio::test]
    async fn test_missing_credential_skipped() {
        let calls = Arc::new(Mutex::new(vec![]));
        let chain = FailoverChain::new(
            vec![
                slot("deepseek", None, Ok("never"), &calls),
                slot("kimi", Some("k2"), Ok("from kimi"), &calls),
            ],
            GenerationConfig::default(),
        );
        let done = chain.complete(Some("deepseek"), &[]).await.unwrap();
        assert_eq!(done.provider_id, "kimi");
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_credential_counts_as_absent() {
        let calls = Arc::new(Mutex::new(vec![]));
        let chain = FailoverChain::new(
            vec![slot("deepseek", Some("   "), Ok("never"), &calls)],
            GenerationConfig::default(),
        );
        assert!(matches!(
            chain.complete(None, &[]).await,
            Err(DocQaError::NoProviderConfigured)
        ));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_fails_over() {
        let calls = Arc::new(Mutex::new(vec![]));
        let chain = FailoverChain::new(
            vec![
                slot("deepseek", Some("k1"), Err("503"), &calls),
                slot("kimi", Some("k2"), Ok("from kimi"), &calls),
            ],
            GenerationConfig::default(),
        );
        let done = chain.complete(None, &[]).await.unwrap();
        assert_eq!(done.provider_id, "kimi");
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_all_failed_propagates_last_error() {
        let calls = Arc::new(Mutex::new(vec![]));
        let chain = FailoverChain::new(
            vec![
                slot("deepseek", Some("k1"), Err("first"), &calls),
                slot("kimi", Some("k2"), Err("second"), &calls),
            ],
            GenerationConfig::default(),
        );
        match chain.complete(None, &[]).await {
            Err(DocQaError::AllProvidersFailed { attempted, source }) => {
                assert_eq!(attempted, 2);
                assert!(source.to_string().contains("second"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_credentials_is_misconfiguration() {
        let calls = Arc::new(Mutex::new(vec![]));
        let chain = FailoverChain::new(
            vec![
                slot("deepseek", None, Ok(""), &calls),
                slot("kimi", None, Ok(""), &calls),
            ],
            GenerationConfig::default(),
        );
        assert!(matches!(
            chain.complete(None, &[]).await,
            Err(DocQaError::NoProviderConfigured)
        ));
        assert_eq!(
            chain.availability(),
            vec![("deepseek", "DEEPSEEK", false), ("kimi", "KIMI", false)]
        );
    }
}
