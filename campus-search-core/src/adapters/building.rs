//! Building-name suggestions from a feature collection.

use std::sync::Arc;

use async_trait::async_trait;

use super::{DEFAULT_LIMIT, SuggestionSource};
use crate::{
    FeatureQuery, FeatureStore, SpatialReference, Suggestion, TransportError,
    clause::contains_clause,
};

/// Layout of the building collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingSourceConfig {
    /// Attribute holding the building name.
    pub name_field: String,
    /// Maximum number of suggestions.
    pub limit: usize,
}

impl Default for BuildingSourceConfig {
    fn default() -> Self {
        Self {
            name_field: "NAME".to_owned(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl BuildingSourceConfig {
    /// Use `name_field` as the building name attribute.
    #[must_use]
    pub fn with_name_field(mut self, name_field: impl Into<String>) -> Self {
        self.name_field = name_field.into();
        self
    }
}

/// Suggests buildings whose name contains the user's text.
///
/// Each suggestion carries the building's WGS84 representative point, so
/// resolving it needs no further request.
pub struct BuildingAdapter {
    store: Arc<dyn FeatureStore>,
    config: BuildingSourceConfig,
}

impl BuildingAdapter {
    /// Build an adapter over the building collection `store`.
    pub fn new(store: Arc<dyn FeatureStore>, config: BuildingSourceConfig) -> Self {
        Self { store, config }
    }

    fn query(&self, term: &str) -> FeatureQuery {
        let name_field = self.config.name_field.as_str();
        FeatureQuery::new(contains_clause(name_field, term.trim()))
            .with_out_fields([name_field])
            .with_order_by([name_field])
            .with_geometry(SpatialReference::WGS84)
            .with_limit(self.config.limit)
    }
}

#[async_trait]
impl SuggestionSource for BuildingAdapter {
    async fn suggest(&self, term: &str) -> Result<Vec<Suggestion>, TransportError> {
        let features = self.store.query(&self.query(term)).await?;
        Ok(features
            .iter()
            .filter_map(|feature| {
                let text = feature.text(&self.config.name_field)?;
                let location = feature.representative_point()?;
                Some(Suggestion::Building { text, location })
            })
            .take(self.config.limit)
            .collect())
    }
}
