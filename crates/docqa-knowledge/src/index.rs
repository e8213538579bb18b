//! In-memory lexical index: document name → ordered chunks.
//!
//! Entries keep insertion order. Putting an existing name replaces its
//! chunks in place (the document keeps its position). All mutations take
//! the write lock, so concurrent writers to the same name resolve
//! last-writer-wins and readers always see whole entries.

use docqa_core::Chunk;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One indexed document.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub name: String,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Default)]
pub struct LexicalIndex {
    documents: RwLock<Vec<IndexedDocument>>,
}

impl LexicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<IndexedDocument>> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<IndexedDocument>> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `chunks` under `name`, replacing any previous entry.
    pub fn put(&self, name: &str, chunks: Vec<Chunk>) {
        let mut docs = self.write();
        match docs.iter_mut().find(|d| d.name == name) {
            Some(existing) => {
                tracing::debug!(
                    "Replacing '{}': {} → {} chunks",
                    name,
                    existing.chunks.len(),
                    chunks.len()
                );
                existing.chunks = chunks;
            }
            None => docs.push(IndexedDocument {
                name: name.to_string(),
                chunks,
            }),
        }
    }

    /// Remove a document. Returns whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        let mut docs = self.write();
        match docs.iter().position(|d| d.name == name) {
            Some(pos) => {
                docs.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Document names in insertion order.
    pub fn list_documents(&self) -> Vec<String> {
        self.read().iter().map(|d| d.name.clone()).collect()
    }

    pub fn document_count(&self) -> usize {
        self.read().len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().iter().any(|d| d.name == name)
    }

    pub fn total_chunk_count(&self) -> usize {
        self.read().iter().map(|d| d.chunks.len()).sum()
    }

    /// All chunks, document order then chunk order.
    pub fn all_chunks(&self) -> Vec<Chunk> {
        self.read()
            .iter()
            .flat_map(|d| d.chunks.iter().cloned())
            .collect()
    }

    /// Consistent copy of every entry, taken under a single read lock.
    pub fn snapshot(&self) -> Vec<IndexedDocument> {
        self.read().clone()
    }
}
