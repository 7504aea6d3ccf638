//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the default per-source count, the per-request
//! timeout, provider credentials and provider endpoints. Endpoints are
//! overridable so tests and mirrors can point adapters elsewhere.

use crate::error::SearchError;
use std::fmt;
use std::time::Duration;

/// Default Pexels search endpoint.
pub const PEXELS_ENDPOINT: &str = "https://api.pexels.com/v1/search";
/// Default Pixabay search endpoint.
pub const PIXABAY_ENDPOINT: &str = "https://pixabay.com/api/";
/// Default Unsplash search endpoint.
pub const UNSPLASH_ENDPOINT: &str = "https://api.unsplash.com/search/photos";
/// Default MediaWiki action API endpoint.
pub const WIKIPEDIA_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// API keys for the providers that need one.
///
/// Keys are treated as already-resolved strings. An empty key is not
/// rejected here; the provider refuses the request and that adapter
/// contributes nothing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    /// Sent verbatim in the `Authorization` header.
    pub pexels_api_key: String,
    /// Sent as the `key` query parameter.
    pub pixabay_api_key: String,
    /// Sent as the `client_id` query parameter.
    pub unsplash_access_key: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &str) -> &'static str {
            if key.is_empty() {
                "<unset>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("ProviderCredentials")
            .field("pexels_api_key", &redact(&self.pexels_api_key))
            .field("pixabay_api_key", &redact(&self.pixabay_api_key))
            .field("unsplash_access_key", &redact(&self.unsplash_access_key))
            .finish()
    }
}

/// Full endpoint URL for each provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub pexels: String,
    pub pixabay: String,
    pub unsplash: String,
    pub wikipedia: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            pexels: PEXELS_ENDPOINT.to_owned(),
            pixabay: PIXABAY_ENDPOINT.to_owned(),
            unsplash: UNSPLASH_ENDPOINT.to_owned(),
            wikipedia: WIKIPEDIA_ENDPOINT.to_owned(),
        }
    }
}

/// Configuration for image search.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Results requested from each provider when the caller gives no count.
    pub per_source_limit: usize,
    /// Timeout applied to every individual outbound HTTP request, in seconds.
    pub timeout_seconds: u64,
    /// Overall deadline for one aggregation, in seconds. `None` waits for
    /// every provider to finish; `Some` returns whatever has completed when
    /// the deadline passes.
    pub request_deadline_seconds: Option<u64>,
    /// User-Agent sent to providers. Wikimedia asks API clients to identify
    /// themselves.
    pub user_agent: String,
    /// Provider API keys.
    pub credentials: ProviderCredentials,
    /// Provider endpoints.
    pub endpoints: ProviderEndpoints,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_source_limit: 10,
            timeout_seconds: 10,
            request_deadline_seconds: None,
            user_agent: concat!("montage/", env!("CARGO_PKG_VERSION")).to_owned(),
            credentials: ProviderCredentials::default(),
            endpoints: ProviderEndpoints::default(),
        }
    }
}

impl SearchConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Aggregation deadline as a [`Duration`], if one is configured.
    pub fn request_deadline(&self) -> Option<Duration> {
        self.request_deadline_seconds.map(Duration::from_secs)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `per_source_limit` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `request_deadline_seconds`, when set, must be greater than 0
    /// - every endpoint must be an absolute `http`/`https` URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.per_source_limit == 0 {
            return Err(SearchError::Config(
                "per_source_limit must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.request_deadline_seconds == Some(0) {
            return Err(SearchError::Config(
                "request_deadline_seconds must be greater than 0 when set".into(),
            ));
        }
        for (name, endpoint) in [
            ("pexels", &self.endpoints.pexels),
            ("pixabay", &self.endpoints.pixabay),
            ("unsplash", &self.endpoints.unsplash),
            ("wikipedia", &self.endpoints.wikipedia),
        ] {
            let parsed = url::Url::parse(endpoint)
                .map_err(|e| SearchError::Config(format!("{name} endpoint is invalid: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SearchError::Config(format!(
                    "{name} endpoint must use http or https"
                )));
            }
        }
        Ok(())
    }
}
