//! Facade crate for campus search.
//!
//! This crate re-exports the core engine and, behind the `http` feature, the
//! ArcGIS REST backends.

#![forbid(unsafe_code)]

pub use campus_search_core::{
    AggregatorOptions, FeatureStore, FilterDefinition, FilterTable, GeocodeProvider,
    LocationCapability, RawSuggestion, ResolverOptions, SearchArea, SearchBackends, SearchError,
    SearchResolver, SearchResult, SourceCatalogue, SourceDescriptor, SourceKind, SourceScope,
    StaleResponseGuard, StaticLocation, SuggestError, Suggestion, SuggestionAggregator,
    TransportError,
};

#[cfg(feature = "http")]
pub use campus_search_data::{ArcGisFeatureStore, ArcGisGeocoder, HttpClientConfig};
