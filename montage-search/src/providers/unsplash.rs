//! Unsplash photo search.
//!
//! `GET /search/photos?query=..&per_page=..&client_id=..`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SearchError;
use crate::http;
use crate::provider::ImageProvider;
use crate::types::{ImageResult, ImageSource};

use super::keep_record;

#[derive(Debug, Deserialize)]
pub(crate) struct UnsplashResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    urls: UnsplashUrls,
    #[serde(default)]
    links: UnsplashLinks,
    #[serde(default)]
    user: UnsplashUser,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    small: String,
    full: String,
}

#[derive(Debug, Default, Deserialize)]
struct UnsplashLinks {
    #[serde(default)]
    html: String,
}

#[derive(Debug, Default, Deserialize)]
struct UnsplashUser {
    #[serde(default)]
    name: String,
    #[serde(default)]
    links: UnsplashLinks,
}

/// Unsplash adapter.
pub struct UnsplashProvider {
    client: reqwest::Client,
    endpoint: String,
    access_key: String,
}

impl UnsplashProvider {
    /// Create an adapter that queries `endpoint` with `access_key`.
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            access_key: access_key.into(),
        }
    }
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Unsplash
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<ImageResult>, SearchError> {
        tracing::trace!(query, limit, "Unsplash search");

        let per_page = limit.to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("query", query),
            ("per_page", per_page.as_str()),
            ("client_id", self.access_key.as_str()),
        ]);

        let response: UnsplashResponse = http::get_json(ImageSource::Unsplash, request).await?;
        Ok(map_unsplash_response(response))
    }
}

/// Map a decoded Unsplash response, keeping the provider's order.
pub(crate) fn map_unsplash_response(response: UnsplashResponse) -> Vec<ImageResult> {
    response
        .results
        .into_iter()
        .map(|photo| ImageResult {
            id: format!("unsplash_{}", photo.id),
            thumbnail_url: photo.urls.small,
            full_size_url: photo.urls.full,
            width: photo.width.unwrap_or(0),
            height: photo.height.unwrap_or(0),
            source: ImageSource::Unsplash,
            source_page_url: photo.links.html,
            attribution_name: photo.user.name,
            attribution_url: photo.user.links.html,
            description: None,
        })
        .filter(keep_record)
        .collect()
}
