//! The JSON catalogue describing every backend a search uses.

use std::io::BufReader;

use camino::Utf8Path;
use campus_search_core::{
    BuildingSourceConfig, FilterTable, SearchArea, SourceCatalogue, SpaceSourceConfig,
};
use cap_std::{ambient_authority, fs_utf8};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Backends and static data for one campus.
///
/// ```json
/// {
///   "sources": [{ "identifier": "campus", "display_title": "Campus",
///                 "endpoint": "https://geo.example.org/GeocodeServer",
///                 "scope": "on-campus" }],
///   "filters": [],
///   "buildings": { "url": "https://maps.example.org/MapServer/0" },
///   "spaces": { "url": "https://maps.example.org/MapServer/1",
///               "search_fields": ["CLIENT", "DEPT"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogueFile {
    /// Geocoding sources in catalogue order.
    pub sources: SourceCatalogue,
    /// Static filter table.
    #[serde(default)]
    pub filters: FilterTable,
    /// Building feature layer.
    pub buildings: BuildingLayer,
    /// Space feature layer.
    pub spaces: SpaceLayer,
    /// Area location suggestions are biased towards.
    #[serde(default)]
    pub search_area: SearchArea,
}

/// Where the building collection lives and how it is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuildingLayer {
    /// Feature layer URL.
    pub url: String,
    /// Attribute holding the building name.
    #[serde(default)]
    pub name_field: Option<String>,
}

impl BuildingLayer {
    /// Adapter configuration for this layer.
    #[must_use]
    pub fn source_config(&self) -> BuildingSourceConfig {
        let config = BuildingSourceConfig::default();
        match &self.name_field {
            Some(field) => config.with_name_field(field.as_str()),
            None => config,
        }
    }
}

/// Where the space collection lives and how it is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpaceLayer {
    /// Feature layer URL.
    pub url: String,
    /// Map layer generated filter clauses apply to.
    #[serde(default)]
    pub layer: Option<String>,
    /// Attributes searched for the user's text.
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Attribute naming the client a space is assigned to.
    #[serde(default)]
    pub client_field: Option<String>,
}

impl SpaceLayer {
    /// Adapter configuration for this layer.
    ///
    /// Unset fields keep the adapter defaults.
    #[must_use]
    pub fn source_config(&self) -> SpaceSourceConfig {
        let mut config = SpaceSourceConfig::default();
        if let Some(layer) = &self.layer {
            config.layer.clone_from(layer);
        }
        if !self.search_fields.is_empty() {
            config.search_fields.clone_from(&self.search_fields);
        }
        if let Some(field) = &self.client_field {
            config.client_field.clone_from(field);
        }
        config
    }
}

/// Loads a JSON-encoded [`CatalogueFile`] from disk.
///
/// # Errors
///
/// Returns [`CliError::OpenCatalogue`] when the file cannot be opened and
/// [`CliError::ParseCatalogue`] when it is not a valid catalogue.
pub fn load_catalogue(path: &Utf8Path) -> Result<CatalogueFile, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenCatalogue {
            path: path.to_path_buf(),
            source,
        }
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseCatalogue {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_search_core::SourceScope;
    use rstest::rstest;

    const MINIMAL: &str = r#"{
        "sources": [
            {"identifier": "campus", "display_title": "Campus",
             "endpoint": "https://geo.example.org/Campus/GeocodeServer", "scope": "on-campus"},
            {"identifier": "world", "display_title": "World",
             "endpoint": "https://geo.example.org/World/GeocodeServer", "scope": "off-campus"}
        ],
        "buildings": {"url": "https://maps.example.org/MapServer/0"},
        "spaces": {"url": "https://maps.example.org/MapServer/1"}
    }"#;

    #[rstest]
    fn minimal_catalogue_takes_defaults() {
        let catalogue: CatalogueFile = serde_json::from_str(MINIMAL).expect("catalogue parses");

        assert_eq!(catalogue.sources.len(), 2);
        assert_eq!(
            catalogue.sources.in_scope(SourceScope::OnCampus).count(),
            1
        );
        assert!(catalogue.filters.is_empty());
        assert_eq!(catalogue.search_area, SearchArea::default());
        assert_eq!(
            catalogue.buildings.source_config(),
            BuildingSourceConfig::default()
        );
        assert_eq!(catalogue.spaces.source_config(), SpaceSourceConfig::default());
    }

    #[rstest]
    fn layer_overrides_replace_adapter_defaults() {
        let spaces = SpaceLayer {
            url: "https://maps.example.org/MapServer/1".into(),
            layer: Some("rooms".into()),
            search_fields: vec!["CLIENT".into(), "DEPT".into()],
            client_field: Some("DEPT".into()),
        };
        let buildings = BuildingLayer {
            url: "https://maps.example.org/MapServer/0".into(),
            name_field: Some("BLDG_NAME".into()),
        };

        let space_config = spaces.source_config();
        assert_eq!(space_config.layer, "rooms");
        assert_eq!(space_config.search_fields, vec!["CLIENT", "DEPT"]);
        assert_eq!(space_config.client_field, "DEPT");
        assert_eq!(buildings.source_config().name_field, "BLDG_NAME");
    }
}
