//! Core types: the normalised image record, provider identification,
//! and the aggregated response.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One discovered image, normalised from a provider-specific payload.
///
/// Field names on the wire follow the JSON the HTTP API has always
/// returned (`thumbnail`, `full_size`, `source_url`, `photographer`...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Source-qualified identifier, unique within one aggregated response.
    pub id: String,
    /// URL of a small preview rendition.
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    /// URL of the largest rendition the provider exposes.
    #[serde(rename = "full_size")]
    pub full_size_url: String,
    /// Pixel width, `0` when the provider does not report it.
    pub width: u32,
    /// Pixel height, `0` when the provider does not report it.
    pub height: u32,
    /// Which provider produced this record.
    pub source: ImageSource,
    /// Link to the listing or article the image came from.
    #[serde(rename = "source_url")]
    pub source_page_url: String,
    /// Creator or source site name.
    #[serde(rename = "photographer")]
    pub attribution_name: String,
    /// Link to the creator or source site.
    #[serde(rename = "photographer_url")]
    pub attribution_url: String,
    /// Contextual text, only set when the provider supplies some.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Image providers montage can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSource {
    /// Pexels stock photos.
    Pexels,
    /// Pixabay stock photos.
    Pixabay,
    /// Unsplash photos.
    Unsplash,
    /// Images embedded in Wikipedia articles, resolved through Commons.
    Wikipedia,
}

impl ImageSource {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pexels => "Pexels",
            Self::Pixabay => "Pixabay",
            Self::Unsplash => "Unsplash",
            Self::Wikipedia => "Wikipedia",
        }
    }

    /// Returns all provider variants.
    pub fn all() -> &'static [ImageSource] {
        &[Self::Pexels, Self::Pixabay, Self::Unsplash, Self::Wikipedia]
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A provider name that matched none of the known providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown image source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for ImageSource {
    type Err = UnknownSource;

    /// Case-insensitive match against the provider names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|source| source.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSource(wanted.to_owned()))
    }
}

/// The merged answer to one aggregated search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as the caller sent it.
    pub query: String,
    /// Every record returned by the selected providers.
    pub results: Vec<ImageResult>,
    /// Always `results.len()`.
    pub total: usize,
}

impl SearchResponse {
    /// Build a response whose `total` is derived from `results`.
    pub fn new(query: impl Into<String>, results: Vec<ImageResult>) -> Self {
        let total = results.len();
        Self {
            query: query.into(),
            results,
            total,
        }
    }
}
