//! Wiring a catalogue to concrete backends.

use std::sync::Arc;

use campus_search_core::{LocationCapability, SearchBackends};
use campus_search_data::{ArcGisFeatureStore, ArcGisGeocoder, HttpClientConfig};

use crate::{CatalogueFile, CliError};

/// Everything needed to build the backends for one invocation.
pub struct BackendRequest<'a> {
    /// Loaded catalogue.
    pub catalogue: &'a CatalogueFile,
    /// HTTP settings for remote services.
    pub http: &'a HttpClientConfig,
    /// Device-location capability for "my location".
    pub location: Arc<dyn LocationCapability>,
}

/// Builds the search backends for the current invocation.
pub trait BackendBuilder {
    /// Build backends for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::BuildBackend`] when a backend cannot be constructed.
    fn build(&self, request: BackendRequest<'_>) -> Result<SearchBackends, CliError>;
}

/// Builds ArcGIS REST backends for every service in the catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArcGisBackendBuilder;

impl BackendBuilder for ArcGisBackendBuilder {
    fn build(&self, request: BackendRequest<'_>) -> Result<SearchBackends, CliError> {
        let BackendRequest {
            catalogue,
            http,
            location,
        } = request;
        let geocoder =
            ArcGisGeocoder::with_config(http.clone()).map_err(|source| CliError::BuildBackend {
                url: "geocode sources".to_owned(),
                source,
            })?;
        let buildings = feature_store(&catalogue.buildings.url, http)?;
        let spaces = feature_store(&catalogue.spaces.url, http)?;
        Ok(SearchBackends {
            geocoder: Arc::new(geocoder),
            catalogue: Arc::new(catalogue.sources.clone()),
            search_area: catalogue.search_area,
            filters: Arc::new(catalogue.filters.clone()),
            buildings: Arc::new(buildings),
            building_config: catalogue.buildings.source_config(),
            spaces: Arc::new(spaces),
            space_config: catalogue.spaces.source_config(),
            location,
        })
    }
}

fn feature_store(url: &str, http: &HttpClientConfig) -> Result<ArcGisFeatureStore, CliError> {
    ArcGisFeatureStore::with_config(url, http.clone()).map_err(|source| CliError::BuildBackend {
        url: url.to_owned(),
        source,
    })
}
