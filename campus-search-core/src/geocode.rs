//! The geocoder collaborator.

use async_trait::async_trait;
use geo::Coord;

use crate::{SourceDescriptor, SpatialReference, TransportError};

/// Parameters of a geocoder `suggest` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestRequest {
    /// User text.
    pub text: String,
    /// WGS84 coordinate results are biased towards.
    pub anchor: Coord<f64>,
    /// Radius around `anchor` in metres.
    pub radius_metres: f64,
    /// Upper bound on the number of suggestions.
    pub max_suggestions: usize,
}

/// A raw geocoder suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeSuggestion {
    /// Display text.
    pub text: String,
    /// Opaque key used to look the match up again.
    pub magic_key: String,
    /// Whether the suggestion names a category rather than a place.
    pub is_collection: bool,
}

impl GeocodeSuggestion {
    /// A place suggestion.
    pub fn new(text: impl Into<String>, magic_key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            magic_key: magic_key.into(),
            is_collection: false,
        }
    }
}

/// Parameters of a geocoder `findAddressCandidates` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRequest {
    /// Text of the suggestion being resolved.
    pub text: String,
    /// Key returned with the suggestion.
    pub magic_key: String,
    /// Coordinate system the candidates must be returned in.
    pub out_sr: SpatialReference,
    /// Upper bound on the number of candidates.
    pub max_locations: usize,
}

/// A located geocoder match.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressCandidate {
    /// Matched address or place name.
    pub address: String,
    /// Coordinate in the requested spatial reference.
    pub location: Coord<f64>,
    /// Match score reported by the geocoder.
    pub score: f64,
}

/// A remote geocoding service.
///
/// The service to contact is identified by the [`SourceDescriptor`] passed to
/// each call, so a single implementation can serve the whole catalogue.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Fetch suggestions for partial text.
    async fn suggest(
        &self,
        source: &SourceDescriptor,
        request: &SuggestRequest,
    ) -> Result<Vec<GeocodeSuggestion>, TransportError>;

    /// Resolve a suggestion key to located candidates, best match first.
    async fn find_candidates(
        &self,
        source: &SourceDescriptor,
        request: &CandidateRequest,
    ) -> Result<Vec<AddressCandidate>, TransportError>;
}
