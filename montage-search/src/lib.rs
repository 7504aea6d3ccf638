//! # montage-search
//!
//! Concurrent image search across Pexels, Pixabay, Unsplash and Wikipedia.
//!
//! One query fans out to every selected provider at once. Each provider's
//! response is mapped into the same [`ImageResult`] record, and the blocks
//! are merged into a single [`SearchResponse`].
//!
//! ## Design
//!
//! - One adapter per provider behind the [`ImageProvider`] trait
//! - All selected providers run concurrently on their own tasks
//! - Graceful degradation: a provider that fails, times out or returns
//!   garbage contributes nothing, and the others still return results
//! - No ranking, dedup or caching: results keep each provider's own order
//!
//! ## Security
//!
//! - API keys never appear in error messages or `Debug` output
//! - Search queries are logged only at trace level

pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod types;

pub use config::{ProviderCredentials, ProviderEndpoints, SearchConfig};
pub use error::{Result, SearchError};
pub use orchestrator::{Aggregator, SourceFilter};
pub use provider::ImageProvider;
pub use types::{ImageResult, ImageSource, SearchResponse};

/// Search every provider using the settings in `config`.
///
/// Builds a fresh [`Aggregator`] for the call. Long-running services should
/// build one with [`Aggregator::from_config`] and reuse it.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, or
/// [`SearchError::InvalidQuery`] if `query` is blank. Provider failures are
/// logged and never returned.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> montage_search::Result<()> {
/// let config = montage_search::SearchConfig::default();
/// let response = montage_search::search("lighthouse", &config).await?;
/// for image in &response.results {
///     println!("{}: {}", image.source, image.full_size_url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<SearchResponse> {
    let aggregator = Aggregator::from_config(config)?;
    aggregator
        .aggregate(query, config.per_source_limit, &SourceFilter::All)
        .await
}

/// Search only the providers selected by `sources` (`"all"` or a
/// comma-separated list of names).
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_sources(
    query: &str,
    sources: &str,
    config: &SearchConfig,
) -> Result<SearchResponse> {
    let aggregator = Aggregator::from_config(config)?;
    aggregator
        .aggregate(query, config.per_source_limit, &SourceFilter::parse(sources))
        .await
}
