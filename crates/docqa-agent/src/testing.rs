//! Test doubles shared by this crate's unit tests.

use async_trait::async_trait;
use docqa_core::config::GenerationConfig;
use docqa_core::error::{DocQaError, Result};
use docqa_core::traits::provider::{ChatProvider, GenerateParams};
use docqa_core::types::Message;
use docqa_providers::{FailoverChain, ProviderSlot};
use std::sync::{Arc, Mutex};

/// Every request a scripted provider received.
pub type CallLog = Arc<Mutex<Vec<(String, Vec<Message>)>>>;

/// Answers with a fixed reply (or fails) and records the messages it saw.
pub struct ScriptedProvider {
    pub name: String,
    pub reply: std::result::Result<String, String>,
    pub calls: CallLog,
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        _api_key: &str,
        messages: &[Message],
        _params: &GenerateParams,
    ) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((self.name.clone(), messages.to_vec()));
        self.reply.clone().map_err(DocQaError::Provider)
    }
}

/// A provider entry for the chain: `(id, display name, credential, reply)`.
pub type SlotSpec<'a> = (&'a str, &'a str, Option<&'a str>, std::result::Result<&'a str, &'a str>);

pub fn chain(specs: &[SlotSpec<'_>], calls: &CallLog) -> FailoverChain {
    let slots = specs
        .iter()
        .map(|(id, display, key, reply)| {
            let key = key.map(String::from);
            ProviderSlot::new(
                id,
                display,
                "test-model",
                Box::new(move || key.clone()),
                Arc::new(ScriptedProvider {
                    name: id.to_string(),
                    reply: reply.map(String::from).map_err(String::from),
                    calls: Arc::clone(calls),
                }),
            )
        })
        .collect();
    FailoverChain::new(slots, GenerationConfig::default())
}
