//! ArcGIS REST response shapes.
//!
//! Only the fields campus search reads are modelled. See the ArcGIS REST API
//! reference for the geocode `suggest` and `findAddressCandidates`
//! operations and the feature layer `query` operation.

use std::collections::HashMap;

use campus_search_core::{AddressCandidate, AttributeValue, Feature, GeocodeSuggestion};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon, Winding};
use serde::Deserialize;
use serde_json::Value;

/// A response body: either the in-band error object or a payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Failure { error: ServiceError },
    Success(T),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceError {
    pub(crate) code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

impl ServiceError {
    /// The message followed by any details in parentheses.
    pub(crate) fn describe(&self) -> String {
        if self.details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, self.details.join("; "))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestResponse {
    #[serde(default)]
    pub(crate) suggestions: Vec<WireSuggestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSuggestion {
    text: String,
    magic_key: String,
    #[serde(default)]
    is_collection: bool,
}

impl From<WireSuggestion> for GeocodeSuggestion {
    fn from(wire: WireSuggestion) -> Self {
        let mut suggestion = Self::new(wire.text, wire.magic_key);
        suggestion.is_collection = wire.is_collection;
        suggestion
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidatesResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCandidate {
    address: String,
    location: WirePoint,
    #[serde(default)]
    score: f64,
}

impl WireCandidate {
    /// The candidate, or `None` when its location is empty.
    pub(crate) fn into_candidate(self) -> Option<AddressCandidate> {
        Some(AddressCandidate {
            address: self.address,
            location: self.location.coord()?,
            score: self.score,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    x: Option<f64>,
    y: Option<f64>,
}

impl WirePoint {
    fn coord(&self) -> Option<Coord<f64>> {
        Some(Coord {
            x: self.x?,
            y: self.y?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub(crate) features: Vec<WireFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFeature {
    #[serde(default)]
    attributes: HashMap<String, Value>,
    #[serde(default)]
    geometry: Option<EsriGeometry>,
}

impl From<WireFeature> for Feature {
    fn from(wire: WireFeature) -> Self {
        Self {
            attributes: wire
                .attributes
                .into_iter()
                .map(|(field, value)| (field, attribute(value)))
                .collect(),
            geometry: wire.geometry.and_then(EsriGeometry::into_geometry),
        }
    }
}

fn attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(flag) => AttributeValue::Bool(flag),
        Value::Number(number) => number.as_i64().map_or_else(
            || number.as_f64().map_or(AttributeValue::Null, AttributeValue::Float),
            AttributeValue::Integer,
        ),
        Value::String(text) => AttributeValue::Text(text),
        other => AttributeValue::Text(other.to_string()),
    }
}

/// Esri JSON geometry. Positions may carry z and m values after x and y.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EsriGeometry {
    Polygon { rings: Vec<Vec<Vec<f64>>> },
    Polyline { paths: Vec<Vec<Vec<f64>>> },
    Point { x: Option<f64>, y: Option<f64> },
}

impl EsriGeometry {
    fn into_geometry(self) -> Option<Geometry<f64>> {
        match self {
            Self::Point { x, y } => Some(Geometry::Point(Point::new(x?, y?))),
            Self::Polyline { paths } => {
                let mut lines: Vec<LineString<f64>> =
                    paths.iter().map(|path| line_string(path)).collect();
                match lines.len() {
                    0 => None,
                    1 => lines.pop().map(Geometry::LineString),
                    _ => Some(Geometry::MultiLineString(MultiLineString::new(lines))),
                }
            }
            Self::Polygon { rings } => polygons(&rings),
        }
    }
}

fn line_string(positions: &[Vec<f64>]) -> LineString<f64> {
    positions
        .iter()
        .filter_map(|position| match position.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}

/// Assemble rings into polygons.
///
/// Clockwise rings are exteriors; each counter-clockwise ring is a hole in
/// the exterior before it.
fn polygons(rings: &[Vec<Vec<f64>>]) -> Option<Geometry<f64>> {
    let mut shells: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for ring in rings.iter().map(|ring| line_string(ring)) {
        match shells.last_mut() {
            Some((_, holes)) if !ring.is_cw() => holes.push(ring),
            _ => shells.push((ring, Vec::new())),
        }
    }
    let mut built: Vec<Polygon<f64>> = shells
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect();
    match built.len() {
        0 => None,
        1 => built.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(built))),
    }
}
