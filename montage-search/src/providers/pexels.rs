//! Pexels stock photo search.
//!
//! `GET /v1/search?query=..&per_page=..` with the API key sent verbatim in
//! the `Authorization` header.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SearchError;
use crate::http;
use crate::provider::ImageProvider;
use crate::types::{ImageResult, ImageSource};

use super::keep_record;

#[derive(Debug, Deserialize)]
pub(crate) struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    id: u64,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    photographer: String,
    #[serde(default)]
    photographer_url: String,
    src: PexelsSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsSrc {
    medium: String,
    original: String,
}

/// Pexels adapter.
pub struct PexelsProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PexelsProvider {
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
impl ImageProvider for PexelsProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Pexels
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<ImageResult>, SearchError> {
        tracing::trace!(query, limit, "Pexels search");

        let per_page = limit.to_string();
        let request = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(&[("query", query), ("per_page", per_page.as_str())]);

        let response: PexelsResponse = http::get_json(ImageSource::Pexels, request).await?;
        Ok(map_pexels_response(response))
    }
}

/// Map a decoded Pexels response, keeping the provider's order.
pub(crate) fn map_pexels_response(response: PexelsResponse) -> Vec<ImageResult> {
    response
        .photos
        .into_iter()
        .map(|photo| ImageResult {
            id: format!("pexels_{}", photo.id),
            thumbnail_url: photo.src.medium,
            full_size_url: photo.src.original,
            width: photo.width.unwrap_or(0),
            height: photo.height.unwrap_or(0),
            source: ImageSource::Pexels,
            source_page_url: photo.url,
            attribution_name: photo.photographer,
            attribution_url: photo.photographer_url,
            description: None,
        })
        .filter(keep_record)
        .collect()
}
