//! Top-K retrieval: tokenize → score → stable rank → fallback.

use docqa_core::Chunk;
use serde::Serialize;

use crate::index::{IndexedDocument, LexicalIndex};
use crate::search::{ScoredChunk, score, tokenize};

/// Outcome of one retrieval, with how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    /// Highest score first; fallback chunks carry score 0.
    pub chunks: Vec<ScoredChunk>,
    /// True when no chunk matched and the opening chunks of every document
    /// were returned instead.
    pub fallback: bool,
}

impl Retrieval {
    fn empty() -> Self {
        Self { chunks: Vec::new(), fallback: false }
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks.into_iter().map(|s| s.chunk).collect()
    }
}

/// Retrieves chunks from a borrowed index.
pub struct Retriever<'a> {
    index: &'a LexicalIndex,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a LexicalIndex) -> Self {
        Self { index }
    }

    /// At most `top_k` chunks for `query`, best first.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<Chunk> {
        self.retrieve_scored(query, top_k).into_chunks()
    }

    /// Same as [`retrieve`](Self::retrieve), keeping scores and the fallback flag.
    pub fn retrieve_scored(&self, query: &str, top_k: usize) -> Retrieval {
        let documents = self.index.snapshot();
        if top_k == 0 || documents.iter().all(|d| d.chunks.is_empty()) {
            return Retrieval::empty();
        }

        let tokens = tokenize(query);
        let mut scored: Vec<ScoredChunk> = documents
            .iter()
            .flat_map(|d| d.chunks.iter())
            .map(|chunk| ScoredChunk {
                score: score(&chunk.text, &tokens),
                chunk: chunk.clone(),
            })
            .collect();
        let candidates = scored.len();

        // Stable: equal scores keep index order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.retain(|s| s.score > 0);
        scored.truncate(top_k);

        if !scored.is_empty() {
            tracing::debug!(
                "Retrieved {} of {} chunks ({} tokens, best score {})",
                scored.len(),
                candidates,
                tokens.len(),
                scored[0].score
            );
            return Retrieval { chunks: scored, fallback: false };
        }

        let chunks = fallback_chunks(&documents, top_k);
        tracing::debug!(
            "No lexical match for query ({} tokens); fallback to {} leading chunks",
            tokens.len(),
            chunks.len()
        );
        Retrieval {
            chunks: chunks
                .into_iter()
                .map(|chunk| ScoredChunk { chunk, score: 0 })
                .collect(),
            fallback: true,
        }
    }
}

/// `ceil(top_k / documents)` leading chunks from each document, in
/// insertion order, truncated to `top_k`.
fn fallback_chunks(documents: &[IndexedDocument], top_k: usize) -> Vec<Chunk> {
    if documents.is_empty() {
        return Vec::new();
    }
    let per_document = top_k.div_ceil(documents.len());
    documents
        .iter()
        .flat_map(|d| d.chunks.iter().take(per_document).cloned())
        .take(top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::chunk_text;

    fn doc(index: &LexicalIndex, name: &str, texts: &[&str]) {
        let mut chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(name, i, t.to_string()))
            .collect();
        let total = chunks.len();
        chunks.iter_mut().for_each(|c| c.total_chunks = total);
        index.put(name, chunks);
    }

    fn ids(chunks: &[Chunk]) -> Vec<String> {
        chunks.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_empty_index() {
        let index = LexicalIndex::new();
        assert!(Retriever::new(&index).retrieve("anything", 10).is_empty());
    }

    #[test]
    fn test_ranks_by_score() {
        let index = LexicalIndex::new();
        doc(&index, "a", &["rust is fast", "rust rust rust", "python"]);
        let got = Retriever::new(&index).retrieve("rust", 10);
        assert_eq!(ids(&got), vec!["a-1", "a-0"]);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let index = LexicalIndex::new();
        doc(&index, "first", &["budget report", "unrelated"]);
        doc(&index, "second", &["budget summary"]);
        let got = Retriever::new(&index).retrieve("budget", 10);
        assert_eq!(ids(&got), vec!["first-0", "second-0"]);
    }

    #[test]
    fn test_truncates_to_top_k() {
        let index = LexicalIndex::new();
        doc(&index, "a", &["tax one", "tax two", "tax three", "tax four"]);
        assert_eq!(Retriever::new(&index).retrieve("tax", 2).len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let text = "Invoices are due in 30 days. Late invoices accrue interest. ".repeat(40);
        let index = LexicalIndex::new();
        index.put("terms.txt", chunk_text(&text, "terms.txt", 200, 40));
        index.put("faq.txt", chunk_text(&text, "faq.txt", 150, 30));
        let retriever = Retriever::new(&index);
        let first = ids(&retriever.retrieve("late invoices interest", 5));
        for _ in 0..5 {
            assert_eq!(ids(&retriever.retrieve("late invoices interest", 5)), first);
        }
    }

    #[test]
    fn test_fallback_spreads_across_documents() {
        let index = LexicalIndex::new();
        doc(&index, "a", &["alpha one", "alpha two", "alpha three"]);
        doc(&index, "b", &["beta one", "beta two", "beta three"]);
        let result = Retriever::new(&index).retrieve_scored("zzzz", 4);
        assert!(result.fallback);
        assert!(result.chunks.iter().all(|s| s.score == 0));
        assert_eq!(
            ids(&result.into_chunks()),
            vec!["a-0", "a-1", "b-0", "b-1"]
        );
    }

    #[test]
    fn test_fallback_truncates_to_top_k() {
        let index = LexicalIndex::new();
        for name in ["a", "b", "c"] {
            doc(&index, name, &["x1", "x2", "x3"]);
        }
        // ceil(4 / 3) = 2 per document, 6 collected, then cut to 4.
        let got = Retriever::new(&index).retrieve("nomatch", 4);
        assert_eq!(ids(&got), vec!["a-0", "a-1", "b-0", "b-1"]);
    }

    #[test]
    fn test_fallback_with_short_documents() {
        let index = LexicalIndex::new();
        doc(&index, "tiny", &["only"]);
        doc(&index, "long", &["l0", "l1", "l2", "l3"]);
        let got = Retriever::new(&index).retrieve("zzzz", 4);
        assert_eq!(ids(&got), vec!["tiny-0", "long-0", "long-1"]);
    }

    #[test]
    fn test_removed_document_never_returned() {
        let index = LexicalIndex::new();
        doc(&index, "keep", &["shared keyword"]);
        doc(&index, "drop", &["shared keyword twice keyword"]);
        index.remove("drop");
        let retriever = Retriever::new(&index);
        for query in ["keyword", "no overlap at all"] {
            assert!(
                retriever
                    .retrieve(query, 10)
                    .iter()
                    .all(|c| c.source_document != "drop")
            );
        }
    }
}
