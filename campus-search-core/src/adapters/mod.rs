//! Per-backend suggestion adapters.
//!
//! Each adapter turns user text into an ordered list of [`Suggestion`] values
//! drawn from one backend family. Synchronous adapters implement the same
//! async interface so the aggregator can treat all of them uniformly.

use async_trait::async_trait;

use crate::{Suggestion, TransportError};

mod building;
mod filter;
mod location;
mod my_location;
mod space;

pub use building::{BuildingAdapter, BuildingSourceConfig};
pub use filter::FilterAdapter;
pub use location::LocationAdapter;
pub use my_location::MyLocationAdapter;
pub use space::{SpaceAdapter, SpaceSourceConfig};

/// Default cap on suggestions from feature and filter adapters.
pub const DEFAULT_LIMIT: usize = 5;

/// A query function from user text to suggestions.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Suggestions for `term`, in the order they should be shown.
    async fn suggest(&self, term: &str) -> Result<Vec<Suggestion>, TransportError>;
}

/// Lowercased whitespace-delimited tokens of `term`.
pub(crate) fn tokens(term: &str) -> Vec<String> {
    term.split_whitespace().map(str::to_lowercase).collect()
}
