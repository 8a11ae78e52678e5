//! `GeocodeProvider` backed by ArcGIS geocode services.

use async_trait::async_trait;
use campus_search_core::{
    AddressCandidate, CandidateRequest, GeocodeProvider, GeocodeSuggestion, SourceDescriptor,
    SuggestRequest, TransportError,
};
use log::debug;

use super::{
    client::{ArcGisClient, HttpClientConfig, ProviderBuildError, endpoint},
    wire::{CandidatesResponse, SuggestResponse, WireCandidate},
};

/// Geocoder for any ArcGIS `GeocodeServer` in a source catalogue.
///
/// Each call is sent to the endpoint of the source it is given.
#[derive(Debug, Clone)]
pub struct ArcGisGeocoder {
    client: ArcGisClient,
}

impl ArcGisGeocoder {
    /// Create a geocoder with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a geocoder with explicit HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            client: ArcGisClient::new(config)?,
        })
    }
}

fn suggest_params(request: &SuggestRequest) -> Vec<(&'static str, String)> {
    vec![
        ("text", request.text.clone()),
        (
            "location",
            format!("{},{}", request.anchor.x, request.anchor.y),
        ),
        ("distance", request.radius_metres.to_string()),
        ("maxSuggestions", request.max_suggestions.to_string()),
    ]
}

fn candidate_params(request: &CandidateRequest) -> Vec<(&'static str, String)> {
    vec![
        ("SingleLine", request.text.clone()),
        ("magicKey", request.magic_key.clone()),
        ("outSR", request.out_sr.wkid().to_string()),
        ("maxLocations", request.max_locations.to_string()),
    ]
}

#[async_trait]
impl GeocodeProvider for ArcGisGeocoder {
    async fn suggest(
        &self,
        source: &SourceDescriptor,
        request: &SuggestRequest,
    ) -> Result<Vec<GeocodeSuggestion>, TransportError> {
        let url = endpoint(&source.endpoint, "suggest");
        let response: SuggestResponse = self
            .client
            .get_json(&url, &suggest_params(request))
            .await?;
        debug!(
            "{} suggested {} places",
            source.identifier,
            response.suggestions.len()
        );
        Ok(response.suggestions.into_iter().map(Into::into).collect())
    }

    async fn find_candidates(
        &self,
        source: &SourceDescriptor,
        request: &CandidateRequest,
    ) -> Result<Vec<AddressCandidate>, TransportError> {
        let url = endpoint(&source.endpoint, "findAddressCandidates");
        let response: CandidatesResponse = self
            .client
            .get_json(&url, &candidate_params(request))
            .await?;
        Ok(response
            .candidates
            .into_iter()
            .filter_map(WireCandidate::into_candidate)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_search_core::SpatialReference;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    fn suggest_params_carry_the_search_area() {
        let request = SuggestRequest {
            text: "old ch".into(),
            anchor: Coord {
                x: -72.5267,
                y: 42.3868,
            },
            radius_metres: 25_000.0,
            max_suggestions: 5,
        };

        let params = suggest_params(&request);

        assert_eq!(
            params,
            vec![
                ("text", "old ch".to_owned()),
                ("location", "-72.5267,42.3868".to_owned()),
                ("distance", "25000".to_owned()),
                ("maxSuggestions", "5".to_owned()),
            ]
        );
    }

    #[rstest]
    fn candidate_params_pin_the_output_reference() {
        let request = CandidateRequest {
            text: "Old Chapel".into(),
            magic_key: "dHA9MCNsb2M9".into(),
            out_sr: SpatialReference::WGS84,
            max_locations: 1,
        };

        let params = candidate_params(&request);

        assert!(params.contains(&("outSR", "4326".to_owned())));
        assert!(params.contains(&("magicKey", "dHA9MCNsb2M9".to_owned())));
        assert!(params.contains(&("maxLocations", "1".to_owned())));
    }
}
