//! Search orchestrator: provider selection and concurrent fan-out.
//!
//! [`selection`] turns a caller's `sources` parameter into a
//! [`SourceFilter`]; [`search`] queries every selected provider at once
//! and merges their blocks into one response.

pub mod search;
pub mod selection;

pub use search::Aggregator;
pub use selection::SourceFilter;
