//! Which providers a request should fan out to.
//!
//! Callers pass either `all` or a comma-separated list of provider names.
//! Matching is case-insensitive; names that match no known provider are
//! ignored rather than rejected.

use std::collections::HashSet;
use std::fmt;

use crate::types::ImageSource;

/// Provider selection for one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    /// Query every provider.
    #[default]
    All,
    /// Query only these providers. May be empty, in which case nothing is queried.
    Only(HashSet<ImageSource>),
}

impl SourceFilter {
    /// Parse a `sources` parameter such as `"all"` or `"pexels,Wikipedia"`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Self::All;
        }

        let mut selected = HashSet::new();
        for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name.parse::<ImageSource>() {
                Ok(source) => {
                    selected.insert(source);
                }
                Err(unknown) => tracing::debug!(%unknown, "ignoring unrecognised source"),
            }
        }
        Self::Only(selected)
    }

    /// Whether `source` should be queried.
    pub fn includes(&self, source: ImageSource) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected.contains(&source),
        }
    }
}

impl From<&[ImageSource]> for SourceFilter {
    fn from(sources: &[ImageSource]) -> Self {
        Self::Only(sources.iter().copied().collect())
    }
}

impl fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(selected) => {
                // Stable output regardless of set iteration order.
                let names: Vec<&str> = ImageSource::all()
                    .iter()
                    .filter(|s| selected.contains(*s))
                    .map(ImageSource::name)
                    .collect();
                f.write_str(&names.join(","))
            }
        }
    }
}
