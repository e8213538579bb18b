//! # DocQA Agent
//! Answers questions strictly from uploaded documents.
//!
//! ## Flow
//! ```text
//! ingest(bytes, name, mime) → validate → extract → chunk → LexicalIndex
//! answer(message, model, history)
//!   → Retriever (top 10, fallback if nothing matches)
//!   → citation prompt + last 4 history entries + message
//!   → FailoverChain (preferred provider first)
//!   → AnswerResult { response_text, source_documents, model_used }
//! ```

pub mod conversation;
pub mod orchestrator;
pub mod service;

pub use conversation::Conversation;
pub use orchestrator::AnswerOrchestrator;
pub use service::{DocQa, DocumentInfo};

#[cfg(test)]
pub(crate) mod testing;
