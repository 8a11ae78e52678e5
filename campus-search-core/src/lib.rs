//! Core domain types and search orchestration for campus search.
//!
//! The crate turns free text into an ordered list of [`Suggestion`] values by
//! fanning the query out across independent backends, then resolves a chosen
//! suggestion into a [`SearchResult`]. Backends are reached through the
//! collaborator traits [`GeocodeProvider`], [`FeatureStore`] and
//! [`LocationCapability`]; concrete HTTP implementations live in
//! `campus-search-data`.
//!
//! Callers wrap each `suggest` and `search` call in a [`StaleResponseGuard`]
//! so a slow response to an old keystroke never replaces a newer one.

#![forbid(unsafe_code)]

pub mod adapters;
mod aggregator;
pub mod clause;
mod error;
mod features;
mod filter;
mod geocode;
mod guard;
mod location;
mod resolver;
mod source;
mod suggestion;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use adapters::{BuildingSourceConfig, SpaceSourceConfig};
pub use aggregator::{
    AggregatorOptions, SearchBackends, SuggestionAggregator, SuggestionGroup, SuggestionSources,
};
pub use error::{LocationError, SearchError, SuggestError, TransportError, UnknownSourceKind};
pub use features::{AttributeValue, Feature, FeatureQuery, FeatureStore};
pub use filter::{FilterClause, FilterDefinition, FilterTable};
pub use geocode::{
    AddressCandidate, CandidateRequest, GeocodeProvider, GeocodeSuggestion, SuggestRequest,
};
pub use guard::{Clock, Completion, MonotonicClock, StaleResponseGuard, Tracked};
pub use location::{LocationCapability, StaticLocation};
pub use resolver::{ResolverOptions, SearchResolver};
pub use source::{
    SearchArea, SourceCatalogue, SourceDescriptor, SourceIndex, SourceScope, SpatialReference,
};
pub use suggestion::{MY_LOCATION_TEXT, RawSuggestion, SearchResult, SourceKind, Suggestion};
