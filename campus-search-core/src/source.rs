//! Static configuration describing the geocoding backends.
//!
//! A [`SourceCatalogue`] is loaded once at startup and never changes for the
//! lifetime of the process. Location suggestions carry a [`SourceIndex`] into
//! the catalogue so the resolver can return to the backend that produced them.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which location adapter queries a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SourceScope {
    /// Campus geocoders, queried by the on-campus location adapter.
    OnCampus,
    /// General-purpose geocoders, queried by the off-campus location adapter.
    OffCampus,
}

/// One queryable geocoding backend.
///
/// # Examples
///
/// ```
/// use campus_search_core::{SourceDescriptor, SourceScope};
///
/// let source = SourceDescriptor::new(
///     "world",
///     "World geocoder",
///     "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer",
///     SourceScope::OffCampus,
/// );
/// assert_eq!(source.identifier, "world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceDescriptor {
    /// Stable identifier used in logs and configuration.
    pub identifier: String,
    /// Title shown to users next to results from this source.
    pub display_title: String,
    /// Base URL of the geocode service.
    pub endpoint: String,
    /// Adapter that queries this source.
    pub scope: SourceScope,
}

impl SourceDescriptor {
    /// Construct a descriptor.
    pub fn new(
        identifier: impl Into<String>,
        display_title: impl Into<String>,
        endpoint: impl Into<String>,
        scope: SourceScope,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_title: display_title.into(),
            endpoint: endpoint.into(),
            scope,
        }
    }
}

/// Position of a descriptor within a [`SourceCatalogue`].
///
/// Indices produced by the location adapter always refer to a descriptor in
/// the catalogue they were drawn from. Indices rebuilt from untrusted input
/// are checked again by [`SourceCatalogue::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SourceIndex(usize);

impl SourceIndex {
    /// Wrap a raw position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the raw position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Immutable, ordered list of geocoding sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SourceCatalogue {
    sources: Vec<SourceDescriptor>,
}

impl SourceCatalogue {
    /// Build a catalogue preserving the order of `sources`.
    #[must_use]
    pub const fn new(sources: Vec<SourceDescriptor>) -> Self {
        Self { sources }
    }

    /// Look up a descriptor by index.
    #[must_use]
    pub fn get(&self, index: SourceIndex) -> Option<&SourceDescriptor> {
        self.sources.get(index.get())
    }

    /// Iterate over the descriptors queried by the adapter for `scope`, in
    /// catalogue order.
    pub fn in_scope(
        &self,
        scope: SourceScope,
    ) -> impl Iterator<Item = (SourceIndex, &SourceDescriptor)> + '_ {
        self.sources
            .iter()
            .enumerate()
            .filter(move |(_, source)| source.scope == scope)
            .map(|(index, source)| (SourceIndex::new(index), source))
    }

    /// Number of configured sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no sources are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Well-known ID of a coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SpatialReference(u32);

impl SpatialReference {
    /// Geographic WGS84 coordinates (longitude, latitude in degrees).
    pub const WGS84: Self = Self(4326);

    /// Wrap a well-known ID.
    #[must_use]
    pub const fn new(wkid: u32) -> Self {
        Self(wkid)
    }

    /// Return the well-known ID.
    #[must_use]
    pub const fn wkid(self) -> u32 {
        self.0
    }
}

/// Default anchor: the centre of the Amherst campus (`x = longitude`).
const DEFAULT_ANCHOR: Coord<f64> = Coord {
    x: -72.5267,
    y: 42.3868,
};
const DEFAULT_RADIUS_METRES: f64 = 25_000.0;
const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Area that geocoder suggestions are biased towards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SearchArea {
    /// WGS84 anchor coordinate.
    pub anchor: Coord<f64>,
    /// Search radius around the anchor in metres.
    pub radius_metres: f64,
    /// Maximum suggestions requested from each source.
    pub max_suggestions: usize,
}

impl Default for SearchArea {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR,
            radius_metres: DEFAULT_RADIUS_METRES,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

impl SearchArea {
    /// Set the anchor coordinate.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: Coord<f64>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the search radius.
    #[must_use]
    pub const fn with_radius_metres(mut self, radius_metres: f64) -> Self {
        self.radius_metres = radius_metres;
        self
    }
}
