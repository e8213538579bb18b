//! Answer orchestration: retrieve, build the citation prompt and fail over
//! across providers.

use docqa_core::error::Result;
use docqa_core::types::{AnswerResult, Message};
use docqa_knowledge::prompt::{assemble_context, build_system_prompt, source_names};
use docqa_knowledge::{LexicalIndex, Retriever};
use docqa_providers::FailoverChain;
use std::sync::Arc;

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_HISTORY_WINDOW: usize = 4;

/// Assemble the provider message sequence: system prompt, the last
/// `window` history entries, then the current user message.
pub fn build_messages(system_prompt: &str, history: &[Message], window: usize, message: &str) -> Vec<Message> {
    let tail = &history[history.len().saturating_sub(window)..];
    let mut messages = Vec::with_capacity(tail.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend(tail.iter().cloned());
    messages.push(Message::user(message));
    messages
}

pub struct AnswerOrchestrator {
    index: Arc<LexicalIndex>,
    chain: FailoverChain,
    top_k: usize,
    history_window: usize,
}

impl AnswerOrchestrator {
    pub fn new(index: Arc<LexicalIndex>, chain: FailoverChain) -> Self {
        Self {
            index,
            chain,
            top_k: DEFAULT_TOP_K,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_limits(mut self, top_k: usize, history_window: usize) -> Self {
        self.top_k = top_k;
        self.history_window = history_window;
        self
    }

    pub fn chain(&self) -> &FailoverChain {
        &self.chain
    }

    /// Answer `message` from indexed documents.
    ///
    /// An empty index is not an error: the no-context prompt is sent and
    /// the provider's reply is returned with no sources.
    pub async fn answer(
        &self,
        message: &str,
        preferred_model: Option<&str>,
        history: &[Message],
    ) -> Result<AnswerResult> {
        let retrieval = Retriever::new(&self.index).retrieve_scored(message, self.top_k);
        let fallback = retrieval.fallback;
        let chunks = retrieval.into_chunks();

        let sources = source_names(&chunks);
        let context = assemble_context(&chunks);
        let system_prompt = build_system_prompt(&sources, &context, !chunks.is_empty());

        tracing::debug!(
            "Answering with {} chunks from {} documents (fallback: {})",
            chunks.len(),
            sources.len(),
            fallback
        );

        let messages = build_messages(&system_prompt, history, self.history_window, message);
        let completion = self.chain.complete(preferred_model, &messages).await?;

        Ok(AnswerResult {
            response_text: completion.text,
            source_documents: sources,
            model_used: completion.display_name,
        })
    }
}
