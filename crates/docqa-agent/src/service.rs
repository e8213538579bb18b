//! DocQA service: document intake plus question answering over one
//! shared index.

use chrono::{DateTime, Utc};
use docqa_core::config::DocQaConfig;
use docqa_core::error::{DocQaError, Result};
use docqa_core::traits::TextExtractor;
use docqa_core::types::{AnswerResult, Message};
use docqa_knowledge::intake::{content_hash, validate_document};
use docqa_knowledge::{LexicalIndex, PlainTextExtractor, Retrieval, Retriever, chunk_text};
use docqa_providers::FailoverChain;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::orchestrator::AnswerOrchestrator;

/// Metadata recorded for every ingested document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub name: String,
    pub content_hash: String,
    pub size_bytes: usize,
    pub chunk_count: usize,
    pub ingested_at: DateTime<Utc>,
}

pub struct DocQa {
    config: DocQaConfig,
    index: Arc<LexicalIndex>,
    extractor: Arc<dyn TextExtractor>,
    orchestrator: AnswerOrchestrator,
    documents: RwLock<Vec<DocumentInfo>>,
}

impl DocQa {
    /// Service with the configured provider chain and the plain-text extractor.
    pub fn new(config: DocQaConfig) -> Result<Self> {
        let chain = docqa_providers::create_chain(&config)?;
        Ok(Self::with_parts(config, Arc::new(PlainTextExtractor), chain))
    }

    pub fn with_parts(config: DocQaConfig, extractor: Arc<dyn TextExtractor>, chain: FailoverChain) -> Self {
        let index = Arc::new(LexicalIndex::new());
        let orchestrator = AnswerOrchestrator::new(Arc::clone(&index), chain)
            .with_limits(config.retrieval.top_k, config.retrieval.history_window);
        Self {
            config,
            index,
            extractor,
            orchestrator,
            documents: RwLock::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &DocQaConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<LexicalIndex> {
        &self.index
    }

    pub fn chain(&self) -> &FailoverChain {
        self.orchestrator.chain()
    }

    /// Validate, extract and chunk a document, replacing any document
    /// with the same name. Returns the number of chunks indexed.
    pub fn ingest(&self, bytes: &[u8], name: &str, mime_type: &str) -> Result<usize> {
        let docs = &self.config.documents;
        validate_document(name, bytes.len(), docs)?;

        let text = self.extractor.extract(bytes, mime_type)?;
        let chunks = chunk_text(&text, name, docs.chunk_size, docs.chunk_overlap);
        if chunks.is_empty() {
            return Err(DocQaError::EmptyDocument(name.to_string()));
        }

        let count = chunks.len();
        let info = DocumentInfo {
            name: name.to_string(),
            content_hash: content_hash(bytes),
            size_bytes: bytes.len(),
            chunk_count: count,
            ingested_at: Utc::now(),
        };

        // Metadata lock held across the index update; lock order is
        // documents, then index.
        let replaced = {
            let mut documents = self.write_documents();
            let replaced = self.index.contains(name);
            self.index.put(name, chunks);
            match documents.iter_mut().find(|d| d.name == name) {
                Some(existing) => *existing = info.clone(),
                None => documents.push(info.clone()),
            }
            replaced
        };

        if replaced {
            tracing::info!("📄 Replaced document: {} ({} chunks, sha256 {})", name, count, &info.content_hash[..12]);
        } else {
            tracing::info!("📄 Ingested document: {} ({} chunks, sha256 {})", name, count, &info.content_hash[..12]);
        }
        Ok(count)
    }

    /// Answer from the indexed documents. `model_preference` names a provider
    /// to try first; history is the caller's prior turns.
    pub async fn answer(
        &self,
        message: &str,
        model_preference: Option<&str>,
        history: &[Message],
    ) -> Result<AnswerResult> {
        self.orchestrator.answer(message, model_preference, history).await
    }

    /// Ranked chunks for `query` without calling a provider.
    pub fn search(&self, query: &str, top_k: usize) -> Retrieval {
        Retriever::new(&self.index).retrieve_scored(query, top_k)
    }

    /// Indexed document names in insertion order.
    pub fn list_documents(&self) -> Vec<String> {
        self.index.list_documents()
    }

    pub fn documents(&self) -> Vec<DocumentInfo> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn remove_document(&self, name: &str) -> bool {
        let removed = {
            let mut documents = self.write_documents();
            documents.retain(|d| d.name != name);
            self.index.remove(name)
        };
        if removed {
            tracing::info!("🗑️ Removed document: {}", name);
        }
        removed
    }

    /// Drop every document.
    pub fn reset(&self) {
        {
            let mut documents = self.write_documents();
            documents.clear();
            self.index.clear();
        }
        tracing::info!("🧹 Index cleared");
    }

    fn write_documents(&self) -> RwLockWriteGuard<'_, Vec<DocumentInfo>> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }
}
