//! Wikipedia images, resolved through the MediaWiki action API.
//!
//! Unlike the stock photo providers this takes several round-trips:
//!
//! 1. `list=search` for up to [`MAX_ARTICLES`] relevant articles
//! 2. one batched `prop=images` call listing each article's embedded files
//! 3. one `prop=imageinfo` call per file that survives filtering, to get its
//!    URL and dimensions
//!
//! Step 3 costs one request per surviving image, so this adapter is usually
//! the slowest of the four. File titles are filtered before step 3 to keep
//! that count down. Every call uses `formatversion=2`, which returns pages as
//! arrays in response order instead of objects keyed by page id.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::SearchError;
use crate::http;
use crate::provider::ImageProvider;
use crate::types::{ImageResult, ImageSource};

/// Articles requested from the search stage.
pub const MAX_ARTICLES: usize = 5;

/// File extensions treated as photographs.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

/// Title fragments marking wiki chrome and branding rather than content.
const EXCLUDED_FRAGMENTS: &[&str] = &["icon", "logo", "symbol"];

const ARTICLE_BASE_URL: &str = "https://en.wikipedia.org/?curid=";
const DEFAULT_ARTICLE_TITLE: &str = "Wikipedia Article";
const ATTRIBUTION_NAME: &str = "Wikipedia/Commons";

// ── Response models ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiResponse<Q> {
    query: Option<Q>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    pageid: u64,
}

#[derive(Debug, Deserialize)]
struct PagesQuery<P> {
    #[serde(default = "Vec::new")]
    pages: Vec<P>,
}

#[derive(Debug, Deserialize)]
struct ArticlePage {
    #[serde(default)]
    pageid: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    images: Vec<ImageTitle>,
}

#[derive(Debug, Deserialize)]
struct ImageTitle {
    title: String,
}

#[derive(Debug, Deserialize)]
struct FilePage {
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageInfo {
    #[serde(default)]
    url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

// ── Filtering ─────────────────────────────────────────────────

/// Whether a file title looks like a photograph worth resolving.
///
/// Keeps `.jpg`, `.jpeg`, `.png` and `.gif` files (case-insensitive) and
/// drops anything whose title mentions an icon, logo or symbol.
pub fn is_photographic_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        && !EXCLUDED_FRAGMENTS.iter().any(|fragment| lower.contains(fragment))
}

// ── Adapter ───────────────────────────────────────────────────

/// Wikipedia adapter.
pub struct WikipediaProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl WikipediaProvider {
    /// Create an adapter that talks to the action API at `endpoint`.
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn call<Q: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<Option<Q>, SearchError> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params);

        let response: ApiResponse<Q> = http::get_json(ImageSource::Wikipedia, request).await?;
        if let Some(err) = response.error {
            return Err(SearchError::Http(format!(
                "Wikipedia API error {}: {}",
                err.code, err.info
            )));
        }
        Ok(response.query)
    }

    /// Stage 1: ids of the most relevant articles, best first.
    async fn search_articles(&self, query: &str) -> Result<Vec<u64>, SearchError> {
        let limit = MAX_ARTICLES.to_string();
        let found: Option<SearchQuery> = self
            .call(&[("list", "search"), ("srsearch", query), ("srlimit", limit.as_str())])
            .await?;
        Ok(found
            .map(|q| q.search.into_iter().map(|hit| hit.pageid).collect())
            .unwrap_or_default())
    }

    /// Stage 2: each article with its embedded file titles, in response order.
    async fn list_images(&self, page_ids: &[u64]) -> Result<Vec<ArticlePage>, SearchError> {
        let ids = page_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("|");
        let listed: Option<PagesQuery<ArticlePage>> = self
            .call(&[
                ("prop", "images|imageinfo"),
                ("iiprop", "url|dimensions"),
                ("imlimit", "max"),
                ("pageids", ids.as_str()),
            ])
            .await?;
        Ok(listed.map(|q| q.pages).unwrap_or_default())
    }

    /// Stage 3: URL and dimensions for one file, if it resolves.
    async fn image_info(&self, file_title: &str) -> Result<Option<ImageInfo>, SearchError> {
        let resolved: Option<PagesQuery<FilePage>> = self
            .call(&[
                ("prop", "imageinfo"),
                ("iiprop", "url|dimensions"),
                ("titles", file_title),
            ])
            .await?;
        Ok(resolved.and_then(|q| {
            q.pages
                .into_iter()
                .find_map(|page| page.imageinfo.into_iter().next())
                .filter(|info| !info.url.is_empty())
        }))
    }
}

#[async_trait]
impl ImageProvider for WikipediaProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Wikipedia
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<ImageResult>, SearchError> {
        tracing::trace!(query, limit, "Wikipedia search");

        let page_ids = self.search_articles(query).await?;
        if page_ids.is_empty() {
            tracing::debug!("Wikipedia search found no articles");
            return Ok(Vec::new());
        }

        let pages = self.list_images(&page_ids).await?;
        let mut results = Vec::new();

        // Article order, then image order within each article, decides which
        // images survive truncation at `limit`.
        'articles: for page in pages {
            if page.missing {
                continue;
            }
            let page_url = format!("{ARTICLE_BASE_URL}{}", page.pageid);
            let page_title = page.title.as_deref().unwrap_or(DEFAULT_ARTICLE_TITLE);

            for image in &page.images {
                if results.len() >= limit {
                    break 'articles;
                }
                if !is_photographic_title(&image.title) {
                    tracing::trace!(title = %image.title, "skipping non-photographic file");
                    continue;
                }
                let Some(info) = self.image_info(&image.title).await? else {
                    continue;
                };
                results.push(ImageResult {
                    id: format!("wiki_{}_{}", page.pageid, results.len()),
                    thumbnail_url: info.url.clone(),
                    full_size_url: info.url,
                    width: info.width.unwrap_or(0),
                    height: info.height.unwrap_or(0),
                    source: ImageSource::Wikipedia,
                    source_page_url: page_url.clone(),
                    attribution_name: ATTRIBUTION_NAME.to_owned(),
                    attribution_url: page_url.clone(),
                    description: Some(format!("From article: {page_title}")),
                });
            }
        }

        Ok(results)
    }
}
