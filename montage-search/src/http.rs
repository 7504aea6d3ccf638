//! Shared HTTP client and JSON request helper for provider adapters.
//!
//! One [`reqwest::Client`] is built per aggregator and shared by every
//! adapter. The per-request timeout lives on the client, so each outbound
//! call carries its own timeout rather than sharing one global budget.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::ImageSource;
use serde::de::DeserializeOwned;

/// Build a [`reqwest::Client`] configured for provider API calls.
///
/// The client has:
/// - Per-request timeout from config
/// - The configured User-Agent
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Send `request` and decode a successful JSON body into `T`.
///
/// URLs are stripped from transport errors because several providers take
/// their API key as a query parameter.
///
/// # Errors
///
/// - [`SearchError::Http`] on transport failure, timeout, or non-2xx status
/// - [`SearchError::Parse`] if the body is not the expected JSON shape
pub(crate) async fn get_json<T: DeserializeOwned>(
    source: ImageSource,
    request: reqwest::RequestBuilder,
) -> Result<T, SearchError> {
    let response = request
        .send()
        .await
        .map_err(|e| SearchError::Http(format!("{source} request failed: {}", e.without_url())))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("{source} HTTP error: {}", e.without_url())))?;

    let body = response.text().await.map_err(|e| {
        SearchError::Http(format!("{source} response read failed: {}", e.without_url()))
    })?;

    tracing::trace!(%source, bytes = body.len(), "provider response received");

    serde_json::from_str(&body)
        .map_err(|e| SearchError::Parse(format!("{source} response malformed: {e}")))
}
