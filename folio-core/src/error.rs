//! Error types for Folio Core

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors that occur while parsing a document
///
/// All of these are terminal: a failed parse never yields partial metadata.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The byte stream is not well-formed markup (syntax, encoding, truncation)
    #[error("Malformed document: {0}")]
    MalformedDocument(#[from] quick_xml::Error),

    /// No `book-title`, or a blank one
    #[error("Document has no title")]
    MissingTitle,

    /// Structurally fine, but no body paragraph carried any text
    #[error("Document has no readable text")]
    EmptyContent,
}

impl ParseError {
    /// Short text suitable for showing to the reader
    pub fn user_message(&self) -> &'static str {
        match self {
            ParseError::MalformedDocument(_) => "cannot read document",
            ParseError::MissingTitle | ParseError::EmptyContent => "document not recognized",
        }
    }
}

/// Errors that occur during record store operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid genre taxonomy: {0}")]
    InvalidTaxonomy(String),
}
