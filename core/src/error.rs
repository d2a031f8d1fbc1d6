//! Error types for indexing and search.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// No extractor is registered for the format tag
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("extraction failed for format {format}: {source}")]
    ExtractionFailed {
        format: String,
        #[source]
        source: ExtractError,
    },

    #[error("document not found: {0}")]
    DocumentNotFound(String),
}

/// Errors reported by an [`Extractor`](crate::Extractor).
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("extraction failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
