//! Error types for the montage service.

use montage_search::SearchError;

/// Top-level error type for the image search service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search core error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// The HTTP listener could not be bound.
    #[error("bind error: {0}")]
    Bind(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ServiceError>;
