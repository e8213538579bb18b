//! # DocQA Knowledge Base
//!
//! Lexical retrieval over uploaded documents. No vector DB, no embeddings.
//!
//! ## Design
//! - **Chunking**: ~1000 char windows with 200 char overlap, cut at the
//!   nearest sentence or line boundary
//! - **Scoring**: ASCII words, CJK 2-/3-grams and digit runs matched by
//!   substring count, weighted by token length (capped at 5)
//! - **Fallback**: when nothing matches, the opening chunks of every
//!   document are returned so the model always sees some context
//! - **In-memory**: one process-lifetime index shared behind an `Arc`
//!
//! ## How it works
//! ```text
//! User: "人工智能的应用场景有哪些？"
//!   ↓
//! tokenize → {"人工智能的应用场景有哪些", "人工", "工智", ..., "人工智"}
//!   ↓ score every chunk, stable sort
//! Top 10 chunks (or fallback chunks)
//!   ↓
//! 【segment N】source: doc  →  strict citation prompt
//!   ↓
//! Provider answers from quoted text only
//! ```

pub mod chunker;
pub mod index;
pub mod intake;
pub mod prompt;
pub mod retriever;
pub mod search;

pub use chunker::chunk_text;
pub use index::LexicalIndex;
pub use intake::PlainTextExtractor;
pub use retriever::{Retrieval, Retriever};
pub use search::{ScoredChunk, TokenSet, score, tokenize};
