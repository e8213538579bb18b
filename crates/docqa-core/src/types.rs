//! Data types shared across DocQA crates.

use serde::{Deserialize, Serialize};

/// A bounded, overlapping segment of one document's extracted text.
///
/// `id` is `"<source_document>-<chunk_index>"`. `total_chunks` is back-filled
/// once chunking of the document has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub source_document: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl Chunk {
    pub fn new(source_document: &str, chunk_index: usize, text: String) -> Self {
        Self {
            id: format!("{source_document}-{chunk_index}"),
            text,
            source_document: source_document.to_string(),
            chunk_index,
            total_chunks: 0,
        }
    }
}

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(s)
    }
}

/// A role/content pair as sent to chat-completion providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self { role: Role::System, content: content.to_string() }
    }

    pub fn user(content: &str) -> Self {
        Self { role: Role::User, content: content.to_string() }
    }

    pub fn assistant(content: &str) -> Self {
        Self { role: Role::Assistant, content: content.to_string() }
    }
}

/// Structured answer returned to the UI/API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub response_text: String,
    /// Unique cited document names, in first-seen retrieval order.
    pub source_documents: Vec<String>,
    /// Display name of the provider that produced the answer.
    pub model_used: String,
}
