//! Conversation history with bounded length and export.

use chrono::{DateTime, Utc};
use docqa_core::error::{DocQaError, Result};
use docqa_core::types::{AnswerResult, Message, Role};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Conversation {
    id: String,
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
    total_messages: usize,
    /// Cited documents, first-seen order.
    sources: Vec<String>,
    /// Maximum retained user/assistant pairs.
    max_history: usize,
}

#[derive(Serialize)]
struct ExportMetadata<'a> {
    id: &'a str,
    created_at: String,
    total_messages: usize,
    document_sources: &'a [String],
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    metadata: ExportMetadata<'a>,
    messages: &'a [Message],
}

impl Conversation {
    pub fn new(max_history: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            total_messages: 0,
            sources: Vec::new(),
            max_history,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn total_messages(&self) -> usize {
        self.total_messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The last `k` messages.
    pub fn recent(&self, k: usize) -> &[Message] {
        &self.messages[self.messages.len().saturating_sub(k)..]
    }

    /// Record one user question and the answer it received.
    pub fn push_exchange(&mut self, question: &str, answer: &AnswerResult) {
        self.messages.push(Message::user(question));
        self.messages.push(Message::assistant(&answer.response_text));
        self.total_messages += 2;

        for source in &answer.source_documents {
            if !self.sources.contains(source) {
                self.sources.push(source.clone());
            }
        }

        let cap = self.max_history.saturating_mul(2);
        if self.messages.len() > cap {
            let excess = self.messages.len() - cap;
            self.messages.drain(..excess);
        }
    }

    /// Drop all history and start a fresh conversation.
    pub fn clear(&mut self) {
        *self = Self::new(self.max_history);
    }

    pub fn to_markdown(&self) -> String {
        let mut out = vec![
            "# Conversation Export\n".to_string(),
            format!("- Created At: {}", self.created_at.to_rfc3339()),
            format!("- Total Messages: {}", self.total_messages),
        ];
        if !self.sources.is_empty() {
            out.push(format!("- Document Sources: {}", self.sources.join(", ")));
        }
        out.push("\n---\n".to_string());

        for msg in self.exported() {
            let heading = if msg.role == Role::User { "User" } else { "Assistant" };
            out.push(format!("\n## {heading}\n{}", msg.content));
        }
        out.join("\n")
    }

    pub fn to_json(&self) -> Result<String> {
        let doc = ExportDocument {
            metadata: ExportMetadata {
                id: &self.id,
                created_at: self.created_at.to_rfc3339(),
                total_messages: self.total_messages,
                document_sources: &self.sources,
            },
            messages: &self.messages,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn to_text(&self) -> String {
        let mut lines = vec![
            "Conversation Export".to_string(),
            "=".repeat(50),
            format!("Created At: {}", self.created_at.to_rfc3339()),
            format!("Total Messages: {}", self.total_messages),
        ];
        if !self.sources.is_empty() {
            lines.push(format!("Document Sources: {}", self.sources.join(", ")));
        }
        lines.push("\n".to_string());

        for msg in self.exported() {
            let label = if msg.role == Role::User { "User" } else { "Assistant" };
            lines.push(format!("{label}:\n{}\n", msg.content));
        }
        lines.join("\n")
    }

    /// Write an export chosen by extension: `.md`, `.json` or `.txt`.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let content = match ext.as_str() {
            "md" | "markdown" => self.to_markdown(),
            "json" => self.to_json()?,
            "txt" => self.to_text(),
            other => {
                return Err(DocQaError::Other(format!(
                    "unsupported export format '{other}' (use .md, .json or .txt)"
                )));
            }
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        tracing::info!("💾 Conversation exported to {}", path.display());
        Ok(())
    }

    fn exported(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }
}
