//! # DocQA Core
//!
//! Shared building blocks for the DocQA workspace: configuration, the error
//! taxonomy, data types flowing between crates, and the collaborator traits
//! (chat-completion providers and document-text extractors) that the host
//! plugs in.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::DocQaConfig;
pub use error::{DocQaError, Result};
pub use types::{AnswerResult, Chunk, Message, Role};
