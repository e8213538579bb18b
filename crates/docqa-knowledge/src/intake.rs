//! Document intake: validation, content hashing, plain-text extraction.

use docqa_core::config::DocumentsConfig;
use docqa_core::error::{DocQaError, Result};
use docqa_core::traits::TextExtractor;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Lower-cased file extension of a document name, if any.
pub fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Check type and size limits before any text is extracted.
pub fn validate_document(name: &str, size: usize, config: &DocumentsConfig) -> Result<()> {
    let ext = extension(name).unwrap_or_default();
    if !config.supported_types.iter().any(|t| t.eq_ignore_ascii_case(&ext)) {
        return Err(DocQaError::UnsupportedFileType(if ext.is_empty() {
            name.to_string()
        } else {
            ext
        }));
    }

    let limit = config.max_file_size_bytes();
    if size > limit {
        return Err(DocQaError::FileTooLarge { size, limit });
    }
    Ok(())
}

/// SHA-256 of the raw document bytes, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Best-effort MIME type from a file name.
pub fn mime_for_name(name: &str) -> &'static str {
    match extension(name).as_deref() {
        Some("txt") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("csv") => "text/csv",
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        _ => "application/octet-stream",
    }
}

/// Extracts `text/*` documents as UTF-8. Other formats are rejected so the
/// host can supply a richer extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        if !essence.starts_with("text/") {
            return Err(DocQaError::Extraction(format!(
                "no extractor for MIME type '{mime_type}'"
            )));
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
