//! Document-text extraction contract.

use crate::error::Result;

/// Turns raw document bytes into plain text.
///
/// PDF and Word parsing live behind this trait in the host application.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], mime_type: &str) -> Result<String>;
}
