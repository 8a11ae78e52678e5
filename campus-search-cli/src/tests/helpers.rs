//! Test helpers for writing catalogues and stubbing backends.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use campus_search_core::{
    SearchBackends,
    test_support::{RecordingFeatureStore, StubGeocoder},
};
use campus_search_data::HttpClientConfig;
use std::{cell::RefCell, fs, sync::Arc};
use tempfile::TempDir;

pub(super) const CATALOGUE_JSON: &str = r#"{
    "sources": [
        {"identifier": "campus", "display_title": "Campus",
         "endpoint": "https://geo.example.org/Campus/GeocodeServer", "scope": "on-campus"},
        {"identifier": "world", "display_title": "World",
         "endpoint": "https://geo.example.org/World/GeocodeServer", "scope": "off-campus"}
    ],
    "filters": [
        {"name": "Parking", "tags": ["parking", "lot", "garage"], "clauses": []}
    ],
    "buildings": {"url": "https://maps.example.org/MapServer/0"},
    "spaces": {"url": "https://maps.example.org/MapServer/1", "client_field": "DEPT"}
}"#;

/// A temporary directory holding `catalogue.json`.
pub(super) struct CatalogueDir {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl CatalogueDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _dir: dir,
            path: root.join("catalogue.json"),
        }
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(super) fn write(&self, contents: &str) {
        fs::write(&self.path, contents).expect("write catalogue");
    }
}

/// Builds backends from in-memory doubles, keeping the catalogue's layout.
#[derive(Default)]
pub(super) struct StubBackendBuilder {
    pub(super) geocoder: Arc<StubGeocoder>,
    pub(super) buildings: Arc<RecordingFeatureStore>,
    pub(super) spaces: Arc<RecordingFeatureStore>,
    pub(super) http: RefCell<Option<HttpClientConfig>>,
}

impl BackendBuilder for StubBackendBuilder {
    fn build(&self, request: BackendRequest<'_>) -> Result<SearchBackends, CliError> {
        self.http.replace(Some(request.http.clone()));
        let catalogue = request.catalogue;
        Ok(SearchBackends {
            geocoder: self.geocoder.clone(),
            catalogue: Arc::new(catalogue.sources.clone()),
            search_area: catalogue.search_area,
            filters: Arc::new(catalogue.filters.clone()),
            buildings: self.buildings.clone(),
            building_config: catalogue.buildings.source_config(),
            spaces: self.spaces.clone(),
            space_config: catalogue.spaces.source_config(),
            location: request.location,
        })
    }
}
