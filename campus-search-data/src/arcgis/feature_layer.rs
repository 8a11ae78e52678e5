//! `FeatureStore` backed by an ArcGIS feature layer.

use async_trait::async_trait;
use campus_search_core::{Feature, FeatureQuery, FeatureStore, TransportError};
use log::debug;

use super::{
    client::{ArcGisClient, HttpClientConfig, ProviderBuildError, endpoint},
    wire::QueryResponse,
};

/// One ArcGIS map or feature service layer.
#[derive(Debug, Clone)]
pub struct ArcGisFeatureStore {
    client: ArcGisClient,
    layer_url: String,
}

impl ArcGisFeatureStore {
    /// Query the layer at `layer_url` with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(layer_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(layer_url, HttpClientConfig::default())
    }

    /// Query the layer at `layer_url` with explicit HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(
        layer_url: impl Into<String>,
        config: HttpClientConfig,
    ) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            client: ArcGisClient::new(config)?,
            layer_url: layer_url.into(),
        })
    }

    /// The layer this store queries.
    #[must_use]
    pub fn layer_url(&self) -> &str {
        &self.layer_url
    }
}

fn query_params(query: &FeatureQuery) -> Vec<(&'static str, String)> {
    let out_fields = if query.out_fields.is_empty() {
        "*".to_owned()
    } else {
        query.out_fields.join(",")
    };
    let mut params = vec![
        ("where", query.where_clause.clone()),
        ("outFields", out_fields),
        ("returnGeometry", query.return_geometry.to_string()),
    ];
    if !query.order_by.is_empty() {
        params.push(("orderByFields", query.order_by.join(",")));
    }
    if let Some(out_sr) = query.out_sr {
        params.push(("outSR", out_sr.wkid().to_string()));
    }
    if let Some(limit) = query.limit {
        params.push(("resultRecordCount", limit.to_string()));
    }
    params
}

#[async_trait]
impl FeatureStore for ArcGisFeatureStore {
    async fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>, TransportError> {
        let url = endpoint(&self.layer_url, "query");
        let response: QueryResponse = self.client.get_json(&url, &query_params(query)).await?;
        debug!(
            "{} matched {} features",
            self.layer_url,
            response.features.len()
        );
        Ok(response.features.into_iter().map(Feature::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_search_core::SpatialReference;
    use rstest::rstest;

    #[rstest]
    fn attribute_only_query_asks_for_every_field() {
        let params = query_params(&FeatureQuery::new("1=1"));

        assert_eq!(
            params,
            vec![
                ("where", "1=1".to_owned()),
                ("outFields", "*".to_owned()),
                ("returnGeometry", "false".to_owned()),
            ]
        );
    }

    #[rstest]
    fn located_query_is_projected_and_capped() {
        let query = FeatureQuery::new("UPPER(NAME) LIKE '%LIB%'")
            .with_out_fields(["NAME", "BLDG_ID"])
            .with_order_by(["NAME"])
            .with_geometry(SpatialReference::WGS84)
            .with_limit(5);

        let params = query_params(&query);

        assert!(params.contains(&("outFields", "NAME,BLDG_ID".to_owned())));
        assert!(params.contains(&("orderByFields", "NAME".to_owned())));
        assert!(params.contains(&("returnGeometry", "true".to_owned())));
        assert!(params.contains(&("outSR", "4326".to_owned())));
        assert!(params.contains(&("resultRecordCount", "5".to_owned())));
    }

    #[rstest]
    fn store_remembers_its_layer() {
        let store = ArcGisFeatureStore::new("https://maps.example.org/MapServer/3")
            .expect("store should build");
        assert_eq!(store.layer_url(), "https://maps.example.org/MapServer/3");
    }
}
