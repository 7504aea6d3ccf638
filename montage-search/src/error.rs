//! Error types for the montage-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys or sensitive data appear in
//! error messages.

/// Errors that can occur during an image search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query was missing or blank.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The per-source result count was not a positive integer.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    /// An HTTP request to a provider failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider response did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error was caused by caller input rather than by a
    /// provider or by configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_) | Self::InvalidLimit(_))
    }
}

/// Convenience type alias for montage-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
