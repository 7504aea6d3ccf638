//! Pixabay image search.
//!
//! `GET /api/?key=..&q=..&per_page=..&image_type=photo`. Pixabay has no
//! per-user profile URL in the hit, so one is built from `user` and
//! `user_id`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SearchError;
use crate::http;
use crate::provider::ImageProvider;
use crate::types::{ImageResult, ImageSource};

use super::keep_record;

#[derive(Debug, Deserialize)]
pub(crate) struct PixabayResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PixabayHit {
    id: u64,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
    #[serde(default)]
    image_width: Option<u32>,
    #[serde(default)]
    image_height: Option<u32>,
    #[serde(rename = "pageURL", default)]
    page_url: String,
    #[serde(default)]
    user: String,
    #[serde(rename = "user_id", default)]
    user_id: u64,
}

/// Pixabay adapter.
pub struct PixabayProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PixabayProvider {
    /// Create an adapter that queries `endpoint` with `api_key`.
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ImageProvider for PixabayProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Pixabay
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<ImageResult>, SearchError> {
        tracing::trace!(query, limit, "Pixabay search");

        let per_page = limit.to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("key", self.api_key.as_str()),
            ("q", query),
            ("per_page", per_page.as_str()),
            ("image_type", "photo"),
        ]);

        let response: PixabayResponse = http::get_json(ImageSource::Pixabay, request).await?;
        Ok(map_pixabay_response(response))
    }
}

/// Map a decoded Pixabay response, keeping the provider's order.
pub(crate) fn map_pixabay_response(response: PixabayResponse) -> Vec<ImageResult> {
    response
        .hits
        .into_iter()
        .map(|hit| ImageResult {
            id: format!("pixabay_{}", hit.id),
            attribution_url: format!("https://pixabay.com/users/{}-{}/", hit.user, hit.user_id),
            thumbnail_url: hit.webformat_url,
            full_size_url: hit.large_image_url,
            width: hit.image_width.unwrap_or(0),
            height: hit.image_height.unwrap_or(0),
            source: ImageSource::Pixabay,
            source_page_url: hit.page_url,
            attribution_name: hit.user,
            description: None,
        })
        .filter(keep_record)
        .collect()
}
