//! Trait definition for pluggable image provider adapters.
//!
//! Each provider (Pexels, Pixabay, Unsplash, Wikipedia) implements
//! [`ImageProvider`] to translate a query into its own request shape and its
//! own response shape into [`ImageResult`] values.

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::{ImageResult, ImageSource};

/// A pluggable image provider adapter.
///
/// Implementors handle their own:
///
/// - request construction and credentials
/// - HTTP calls against the provider API
/// - mapping of the provider's typed response into [`ImageResult`]s
///
/// [`fetch`](Self::fetch) reports failures explicitly.
/// [`search`](Self::search) is the boundary the aggregator calls: it never
/// fails, it logs and yields nothing instead.
///
/// All implementations must be `Send + Sync` so the aggregator can run
/// them on separate tasks.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Returns which [`ImageSource`] this adapter queries.
    fn source(&self) -> ImageSource;

    /// Query the provider and map its response.
    ///
    /// # Arguments
    ///
    /// * `query`: non-empty free text; callers have already validated it.
    /// * `limit`: soft cap on the number of records, at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if any request fails, returns a non-success
    /// status, or the response cannot be decoded.
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<ImageResult>, SearchError>;

    /// Query the provider, collapsing any failure into an empty result.
    ///
    /// One provider's outage must never fail the overall aggregation, so
    /// errors stop here after being logged.
    async fn search(&self, query: &str, limit: usize) -> Vec<ImageResult> {
        let source = self.source();
        match self.fetch(query, limit).await {
            Ok(results) => {
                tracing::debug!(%source, count = results.len(), "provider returned results");
                results
            }
            Err(err) => {
                tracing::warn!(%source, error = %err, "provider query failed");
                Vec::new()
            }
        }
    }
}
