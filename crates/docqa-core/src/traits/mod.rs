//! Collaborator traits implemented outside the retrieval core.

pub mod extractor;
pub mod provider;

pub use extractor::TextExtractor;
pub use provider::{ChatProvider, GenerateParams};
