//! Core aggregator: concurrent fan-out to image providers and merge.
//!
//! Every selected provider runs on its own task. Blocks are appended in
//! completion order, so the order of providers within the merged list is
//! unspecified; the order inside one provider's block is that provider's own.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::ImageProvider;
use crate::providers::{PexelsProvider, PixabayProvider, UnsplashProvider, WikipediaProvider};
use crate::types::{ImageResult, ImageSource, SearchResponse};

use super::selection::SourceFilter;

type ProviderBlock = (ImageSource, Vec<ImageResult>);

/// Fans a query out to a set of providers and merges what they return.
pub struct Aggregator {
    providers: Vec<Arc<dyn ImageProvider>>,
    deadline: Option<Duration>,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("sources", &self.sources())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Aggregator {
    /// Aggregate over an explicit set of adapters.
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self {
            providers,
            deadline: None,
        }
    }

    /// Stop waiting for providers after `deadline` and return what has
    /// completed. Without this, every selected provider is awaited.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Build the four standard adapters, sharing one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(config)?;
        let endpoints = &config.endpoints;
        let credentials = &config.credentials;

        let providers: Vec<Arc<dyn ImageProvider>> = vec![
            Arc::new(PexelsProvider::new(
                client.clone(),
                &endpoints.pexels,
                &credentials.pexels_api_key,
            )),
            Arc::new(PixabayProvider::new(
                client.clone(),
                &endpoints.pixabay,
                &credentials.pixabay_api_key,
            )),
            Arc::new(UnsplashProvider::new(
                client.clone(),
                &endpoints.unsplash,
                &credentials.unsplash_access_key,
            )),
            Arc::new(WikipediaProvider::new(client, &endpoints.wikipedia)),
        ];

        Ok(Self {
            providers,
            deadline: config.request_deadline(),
        })
    }

    /// Sources of the registered adapters, in registration order.
    pub fn sources(&self) -> Vec<ImageSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Query every provider selected by `filter` and merge the results.
    ///
    /// # Pipeline
    ///
    /// 1. Reject a blank query or a zero limit before touching any provider
    /// 2. Spawn one task per selected provider on a [`JoinSet`]
    /// 3. Append each provider's block as its task completes
    /// 4. Stop early only if a deadline is configured
    ///
    /// Provider failures never surface here: adapters log them and
    /// contribute nothing. Dropping the returned future aborts any provider
    /// task still running.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] or [`SearchError::InvalidLimit`]
    /// for bad input. No other error is possible.
    pub async fn aggregate(
        &self,
        query: &str,
        per_source_limit: usize,
        filter: &SourceFilter,
    ) -> Result<SearchResponse, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query must not be empty".into()));
        }
        if per_source_limit == 0 {
            return Err(SearchError::InvalidLimit(
                "per_source_limit must be at least 1".into(),
            ));
        }

        tracing::trace!(query, per_source_limit, %filter, "aggregating image search");

        // 1. Fan out, one task per selected provider.
        let mut tasks: JoinSet<ProviderBlock> = JoinSet::new();
        for provider in self.providers.iter().filter(|p| filter.includes(p.source())) {
            let provider = Arc::clone(provider);
            let query = query.to_owned();
            tasks.spawn(async move {
                let source = provider.source();
                let block = provider.search(&query, per_source_limit).await;
                (source, block)
            });
        }
        let dispatched = tasks.len();

        // 2. Merge in completion order.
        let mut results = Vec::new();
        match self.deadline {
            None => collect_blocks(&mut tasks, &mut results).await,
            Some(deadline) => {
                let collected =
                    tokio::time::timeout(deadline, collect_blocks(&mut tasks, &mut results)).await;
                if collected.is_err() {
                    tracing::warn!(
                        pending = tasks.len(),
                        deadline_ms = deadline.as_millis() as u64,
                        "deadline reached, returning partial results"
                    );
                    tasks.abort_all();
                }
            }
        }

        tracing::debug!(dispatched, total = results.len(), "aggregation complete");
        Ok(SearchResponse::new(query, results))
    }
}

/// Drain `tasks`, appending each finished block to `results`.
async fn collect_blocks(tasks: &mut JoinSet<ProviderBlock>, results: &mut Vec<ImageResult>) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((source, block)) => {
                tracing::trace!(%source, count = block.len(), "merging provider block");
                results.extend(block);
            }
            Err(err) => {
                // A panicking adapter contributes nothing, like a failing one.
                tracing::warn!(error = %err, "provider task did not complete");
            }
        }
    }
}
