//! Error taxonomy shared by every DocQA crate.

/// All failures surfaced by the DocQA core.
#[derive(Debug, thiserror::Error)]
pub enum DocQaError {
    /// The text extractor could not produce text from the uploaded bytes.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File size {size} bytes exceeds limit of {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Document '{0}' contains no text")]
    EmptyDocument(String),

    #[error("API key missing for provider: {0}")]
    ApiKeyMissing(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(String),

    /// Every provider with a credential was tried and the last one failed.
    #[error("No provider available: {attempted} attempted, last error: {source}")]
    AllProvidersFailed {
        attempted: usize,
        #[source]
        source: Box<DocQaError>,
    },

    /// No provider has a credential configured at all.
    #[error(
        "No provider configured: set DEEPSEEK_API_KEY or KIMI_API_KEY, or add an api_key under [providers.<name>] in config.toml"
    )]
    NoProviderConfigured,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DocQaError>;
