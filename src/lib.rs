//! montage: an image search service.
//!
//! One query fans out to Pexels, Pixabay, Unsplash and Wikipedia at once and
//! comes back as a single list of normalised image records. The search core
//! lives in the `montage-search` crate; this crate adds configuration, the
//! HTTP boundary and the `montage-server` binary.
//!
//! # Architecture
//!
//! - **Config**: TOML file plus `*_API_KEY` environment overrides
//! - **Server**: axum routes `/api/search` and `/api/health`
//! - **Search**: [`montage_search::Aggregator`] runs every selected provider
//!   concurrently and merges their blocks

pub mod config;
pub mod error;
pub mod server;

pub use config::MontageConfig;
pub use error::{Result, ServiceError};
pub use server::{AppState, SearchServer, router, serve};
