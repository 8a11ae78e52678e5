//! Suggestions offered while the user types and the results they resolve to.

use std::{fmt, str::FromStr};

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{FilterDefinition, SearchError, SourceIndex, UnknownSourceKind};

/// Text of the device-location suggestion.
pub const MY_LOCATION_TEXT: &str = "My location";

/// Backend family a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SourceKind {
    /// Remote geocoder.
    Location,
    /// Building feature collection.
    Building,
    /// Static filter table.
    Filter,
    /// Space feature collection, grouped by client.
    Space,
    /// Device location.
    MyLocation,
}

impl SourceKind {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Building => "building",
            Self::Filter => "filter",
            Self::Space => "space",
            Self::MyLocation => "my-location",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "location" => Ok(Self::Location),
            "building" => Ok(Self::Building),
            "filter" => Ok(Self::Filter),
            "space" => Ok(Self::Space),
            "my-location" => Ok(Self::MyLocation),
            other => Err(UnknownSourceKind {
                kind: other.to_owned(),
            }),
        }
    }
}

/// An autocomplete candidate.
///
/// Each variant carries only the fields its resolution needs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "kebab-case")
)]
pub enum Suggestion {
    /// A geocoder match, resolved with a second request to the same source.
    Location {
        /// Display text.
        text: String,
        /// Geocoder key identifying the match.
        correlation_key: String,
        /// Catalogue position of the source that produced the match.
        source_index: SourceIndex,
    },
    /// A building, located when it was suggested.
    Building {
        /// Building name.
        text: String,
        /// WGS84 representative point.
        location: Coord<f64>,
    },
    /// An entry of the static filter table.
    Filter {
        /// Filter name.
        text: String,
        /// The matched filter.
        filter: FilterDefinition,
    },
    /// All spaces assigned to one client.
    Space {
        /// Client name.
        text: String,
        /// Human-readable count, such as "3 spaces".
        description: String,
        /// Filter selecting the client's spaces.
        filter: FilterDefinition,
    },
    /// The device's current position.
    MyLocation {
        /// Display text.
        text: String,
    },
}

impl Suggestion {
    /// The device-location suggestion.
    #[must_use]
    pub fn my_location() -> Self {
        Self::MyLocation {
            text: MY_LOCATION_TEXT.to_owned(),
        }
    }

    /// Display text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Location { text, .. }
            | Self::Building { text, .. }
            | Self::Filter { text, .. }
            | Self::Space { text, .. }
            | Self::MyLocation { text } => text,
        }
    }

    /// Backend family.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        match self {
            Self::Location { .. } => SourceKind::Location,
            Self::Building { .. } => SourceKind::Building,
            Self::Filter { .. } => SourceKind::Filter,
            Self::Space { .. } => SourceKind::Space,
            Self::MyLocation { .. } => SourceKind::MyLocation,
        }
    }
}

/// Loosely typed suggestion as posted back by a user interface.
///
/// Convert with [`Suggestion::try_from`]; unknown kinds become
/// [`SearchError::UnsupportedSuggestion`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RawSuggestion {
    /// Kind name, as produced by [`SourceKind::as_str`].
    pub kind: String,
    /// Display text.
    pub text: String,
    /// Geocoder key for location suggestions.
    pub correlation_key: Option<String>,
    /// Catalogue position for location suggestions.
    pub source_index: Option<usize>,
    /// Latitude for building suggestions.
    pub latitude: Option<f64>,
    /// Longitude for building suggestions.
    pub longitude: Option<f64>,
    /// Filter for filter and space suggestions.
    pub filter: Option<FilterDefinition>,
    /// Count description for space suggestions.
    pub description: Option<String>,
}

impl TryFrom<RawSuggestion> for Suggestion {
    type Error = SearchError;

    fn try_from(raw: RawSuggestion) -> Result<Self, Self::Error> {
        let kind: SourceKind = raw.kind.parse()?;
        let missing = |field: &'static str| SearchError::MalformedSuggestion { kind, field };
        let RawSuggestion {
            text,
            correlation_key,
            source_index,
            latitude,
            longitude,
            filter,
            description,
            ..
        } = raw;
        match kind {
            SourceKind::Location => Ok(Self::Location {
                text,
                correlation_key: correlation_key.ok_or_else(|| missing("correlation_key"))?,
                source_index: SourceIndex::new(source_index.ok_or_else(|| missing("source_index"))?),
            }),
            SourceKind::Building => Ok(Self::Building {
                text,
                location: Coord {
                    x: longitude.ok_or_else(|| missing("longitude"))?,
                    y: latitude.ok_or_else(|| missing("latitude"))?,
                },
            }),
            SourceKind::Filter => Ok(Self::Filter {
                text,
                filter: filter.ok_or_else(|| missing("filter"))?,
            }),
            SourceKind::Space => Ok(Self::Space {
                text,
                description: description.unwrap_or_default(),
                filter: filter.ok_or_else(|| missing("filter"))?,
            }),
            SourceKind::MyLocation => Ok(Self::MyLocation { text }),
        }
    }
}

impl From<&Suggestion> for RawSuggestion {
    fn from(suggestion: &Suggestion) -> Self {
        let mut raw = Self {
            kind: suggestion.source_kind().as_str().to_owned(),
            text: suggestion.text().to_owned(),
            ..Self::default()
        };
        match suggestion {
            Suggestion::Location {
                correlation_key,
                source_index,
                ..
            } => {
                raw.correlation_key = Some(correlation_key.clone());
                raw.source_index = Some(source_index.get());
            }
            Suggestion::Building { location, .. } => {
                raw.latitude = Some(location.y);
                raw.longitude = Some(location.x);
            }
            Suggestion::Filter { filter, .. } => raw.filter = Some(filter.clone()),
            Suggestion::Space {
                description,
                filter,
                ..
            } => {
                raw.description = Some(description.clone());
                raw.filter = Some(filter.clone());
            }
            Suggestion::MyLocation { .. } => {}
        }
        raw
    }
}

/// The fully resolved outcome of a selected suggestion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    /// Display name.
    pub name: String,
    /// Backend family of the suggestion that was resolved.
    pub source_kind: SourceKind,
    /// WGS84 coordinate, when the result has one.
    pub location: Option<Coord<f64>>,
    /// Filter to apply, when the result is a filter or space group.
    pub filter: Option<FilterDefinition>,
}

impl SearchResult {
    /// A result positioned at `location`.
    pub fn located(name: impl Into<String>, source_kind: SourceKind, location: Coord<f64>) -> Self {
        Self {
            name: name.into(),
            source_kind,
            location: Some(location),
            filter: None,
        }
    }

    /// A result that applies `filter`.
    pub fn filtered(
        name: impl Into<String>,
        source_kind: SourceKind,
        filter: FilterDefinition,
    ) -> Self {
        Self {
            name: name.into(),
            source_kind,
            location: None,
            filter: Some(filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SourceKind::Location)]
    #[case(SourceKind::Building)]
    #[case(SourceKind::Filter)]
    #[case(SourceKind::Space)]
    #[case(SourceKind::MyLocation)]
    fn kind_names_parse_back(#[case] kind: SourceKind) {
        assert_eq!(kind.as_str().parse::<SourceKind>(), Ok(kind));
    }

    #[rstest]
    fn raw_with_unknown_kind_is_unsupported() {
        let raw = RawSuggestion {
            kind: "parking-meter".into(),
            text: "Lot 22".into(),
            ..RawSuggestion::default()
        };
        let err = Suggestion::try_from(raw).expect_err("unknown kind should fail");
        assert_eq!(
            err,
            SearchError::UnsupportedSuggestion {
                kind: "parking-meter".into()
            }
        );
    }

    #[rstest]
    fn raw_location_requires_correlation_key() {
        let raw = RawSuggestion {
            kind: "location".into(),
            text: "Old Chapel".into(),
            source_index: Some(0),
            ..RawSuggestion::default()
        };
        let err = Suggestion::try_from(raw).expect_err("missing key should fail");
        assert_eq!(
            err,
            SearchError::MalformedSuggestion {
                kind: SourceKind::Location,
                field: "correlation_key"
            }
        );
    }

    #[rstest]
    fn building_survives_raw_conversion() {
        let building = Suggestion::Building {
            text: "Du Bois Library".into(),
            location: Coord {
                x: -72.5283,
                y: 42.3898,
            },
        };
        let raw = RawSuggestion::from(&building);
        assert_eq!(raw.latitude, Some(42.3898));
        assert_eq!(Suggestion::try_from(raw), Ok(building));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn suggestions_serialise_with_kind_tag() {
        let json = serde_json::to_value(Suggestion::my_location()).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({ "kind": "my-location", "text": "My location" })
        );
    }
}
