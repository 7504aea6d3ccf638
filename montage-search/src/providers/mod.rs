//! Image provider adapters.
//!
//! Each module provides a struct implementing [`crate::provider::ImageProvider`]
//! for one upstream API, with its own strongly typed response model and an
//! explicit mapping into [`ImageResult`].

pub mod pexels;
pub mod pixabay;
pub mod unsplash;
pub mod wikipedia;

pub use pexels::PexelsProvider;
pub use pixabay::PixabayProvider;
pub use unsplash::UnsplashProvider;
pub use wikipedia::WikipediaProvider;

use crate::types::ImageResult;

/// Drop records that would be unusable to a client: every record must carry
/// both an id and two image URLs.
pub(crate) fn keep_record(record: &ImageResult) -> bool {
    let usable = !record.id.is_empty()
        && !record.thumbnail_url.is_empty()
        && !record.full_size_url.is_empty();
    if !usable {
        tracing::debug!(source = %record.source, id = %record.id, "dropping record without image URLs");
    }
    usable
}
