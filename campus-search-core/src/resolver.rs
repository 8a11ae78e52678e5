//! Resolution of a chosen suggestion into a search result.

use std::{sync::Arc, time::Duration};

use log::{debug, warn};

use crate::{
    CandidateRequest, GeocodeProvider, LocationCapability, LocationError, RawSuggestion,
    SearchBackends, SearchError, SearchResult, SourceCatalogue, SourceIndex, SourceKind,
    SpatialReference, Suggestion,
};

const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for [`SearchResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Upper bound on waiting for the device location.
    pub location_timeout: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
        }
    }
}

impl ResolverOptions {
    /// Set [`Self::location_timeout`].
    #[must_use]
    pub const fn with_location_timeout(mut self, timeout: Duration) -> Self {
        self.location_timeout = timeout;
        self
    }
}

/// Maps a selected [`Suggestion`] to a [`SearchResult`].
///
/// Location suggestions need a second request to the geocoder that produced
/// them and device-location suggestions ask the [`LocationCapability`]. Every
/// other kind resolves from data the suggestion already carries.
#[derive(Clone)]
pub struct SearchResolver {
    geocoder: Arc<dyn GeocodeProvider>,
    catalogue: Arc<SourceCatalogue>,
    location: Arc<dyn LocationCapability>,
    options: ResolverOptions,
}

impl SearchResolver {
    /// Build a resolver over the given collaborators.
    pub fn new(
        geocoder: Arc<dyn GeocodeProvider>,
        catalogue: Arc<SourceCatalogue>,
        location: Arc<dyn LocationCapability>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            geocoder,
            catalogue,
            location,
            options,
        }
    }

    /// Build a resolver sharing the collaborators in `backends`.
    #[must_use]
    pub fn from_backends(backends: &SearchBackends, options: ResolverOptions) -> Self {
        Self::new(
            Arc::clone(&backends.geocoder),
            Arc::clone(&backends.catalogue),
            Arc::clone(&backends.location),
            options,
        )
    }

    /// Resolve `suggestion`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnknownSource`] when a location suggestion names a
    ///   source missing from the catalogue.
    /// - [`SearchError::EmptyResult`] when the geocoder finds no candidate.
    /// - [`SearchError::Transport`] when the geocoder call fails.
    /// - [`SearchError::Location`] when the device location is denied,
    ///   unavailable or too slow.
    pub async fn search(&self, suggestion: &Suggestion) -> Result<SearchResult, SearchError> {
        match suggestion {
            Suggestion::Location {
                text,
                correlation_key,
                source_index,
            } => self.locate(text, correlation_key, *source_index).await,
            Suggestion::Building { text, location } => Ok(SearchResult::located(
                text.clone(),
                SourceKind::Building,
                *location,
            )),
            Suggestion::Filter { text, filter } => Ok(SearchResult::filtered(
                text.clone(),
                SourceKind::Filter,
                filter.clone(),
            )),
            Suggestion::Space { text, filter, .. } => Ok(SearchResult::filtered(
                text.clone(),
                SourceKind::Space,
                filter.clone(),
            )),
            Suggestion::MyLocation { text } => {
                let position = self.current_position().await?;
                Ok(SearchResult::located(
                    text.clone(),
                    SourceKind::MyLocation,
                    position,
                ))
            }
        }
    }

    /// Resolve a loosely typed suggestion.
    ///
    /// # Errors
    ///
    /// [`SearchError::UnsupportedSuggestion`] for an unknown kind,
    /// [`SearchError::MalformedSuggestion`] for a missing field, otherwise as
    /// [`Self::search`].
    pub async fn search_raw(&self, raw: RawSuggestion) -> Result<SearchResult, SearchError> {
        let suggestion = Suggestion::try_from(raw)?;
        self.search(&suggestion).await
    }

    async fn locate(
        &self,
        text: &str,
        key: &str,
        source_index: SourceIndex,
    ) -> Result<SearchResult, SearchError> {
        let Some(source) = self.catalogue.get(source_index) else {
            warn!(
                "suggestion {text:?} refers to source {} but the catalogue has {}",
                source_index.get(),
                self.catalogue.len()
            );
            return Err(SearchError::UnknownSource {
                index: source_index.get(),
            });
        };
        let request = CandidateRequest {
            text: text.to_owned(),
            magic_key: key.to_owned(),
            out_sr: SpatialReference::WGS84,
            max_locations: 1,
        };
        let candidates = self.geocoder.find_candidates(source, &request).await?;
        debug!(
            "{} returned {} candidates for {text:?}",
            source.identifier,
            candidates.len()
        );
        let Some(best) = candidates.into_iter().next() else {
            warn!("{} found no candidates for key {key:?}", source.identifier);
            return Err(SearchError::EmptyResult {
                key: key.to_owned(),
            });
        };
        Ok(SearchResult::located(
            best.address,
            SourceKind::Location,
            best.location,
        ))
    }

    async fn current_position(&self) -> Result<geo::Coord<f64>, LocationError> {
        let limit = self.options.location_timeout;
        tokio::time::timeout(limit, self.location.current_position())
            .await
            .unwrap_or(Err(LocationError::Timeout {
                timeout_secs: limit.as_secs(),
            }))
    }
}
