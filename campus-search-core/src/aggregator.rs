//! Fan-out of one query across every applicable adapter.
//!
//! All included adapters run concurrently and the aggregator waits for every
//! one of them, so the merged order never depends on which backend answered
//! first. A single failing adapter fails the whole batch.

use std::{collections::HashSet, fmt, sync::Arc};

use log::{debug, warn};

use crate::{
    FeatureStore, FilterTable, GeocodeProvider, LocationCapability, SearchArea, SourceCatalogue,
    SourceScope, SuggestError, Suggestion,
    adapters::{
        BuildingAdapter, BuildingSourceConfig, FilterAdapter, LocationAdapter, MyLocationAdapter,
        SpaceAdapter, SpaceSourceConfig, SuggestionSource,
    },
};

/// Adapter slots, in the order their suggestions are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionGroup {
    /// Static filter table.
    Filters,
    /// Space clients.
    Spaces,
    /// Campus geocoders.
    OnCampusLocations,
    /// Building collection.
    Buildings,
    /// General-purpose geocoders.
    OffCampusLocations,
    /// Device location.
    MyLocation,
}

impl SuggestionGroup {
    /// Every group in display order.
    pub const ORDER: [Self; 6] = [
        Self::Filters,
        Self::Spaces,
        Self::OnCampusLocations,
        Self::Buildings,
        Self::OffCampusLocations,
        Self::MyLocation,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Filters => "filter",
            Self::Spaces => "space",
            Self::OnCampusLocations => "on-campus location",
            Self::Buildings => "building",
            Self::OffCampusLocations => "off-campus location",
            Self::MyLocation => "my-location",
        }
    }
}

impl fmt::Display for SuggestionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which adapters a [`SuggestionAggregator`] consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// Skip the filter and space adapters.
    pub locations_only: bool,
    /// Skip the off-campus location adapter.
    pub on_campus_locations_only: bool,
}

impl AggregatorOptions {
    /// Set [`Self::locations_only`].
    #[must_use]
    pub const fn with_locations_only(mut self, enabled: bool) -> Self {
        self.locations_only = enabled;
        self
    }

    /// Set [`Self::on_campus_locations_only`].
    #[must_use]
    pub const fn with_on_campus_locations_only(mut self, enabled: bool) -> Self {
        self.on_campus_locations_only = enabled;
        self
    }

    /// Whether `group` takes part in aggregation.
    #[must_use]
    pub const fn includes(self, group: SuggestionGroup) -> bool {
        match group {
            SuggestionGroup::Filters | SuggestionGroup::Spaces => !self.locations_only,
            SuggestionGroup::OffCampusLocations => !self.on_campus_locations_only,
            SuggestionGroup::OnCampusLocations
            | SuggestionGroup::Buildings
            | SuggestionGroup::MyLocation => true,
        }
    }
}

/// Backends and static configuration shared by the aggregator and resolver.
#[derive(Clone)]
pub struct SearchBackends {
    /// Geocoder used for every catalogue source.
    pub geocoder: Arc<dyn GeocodeProvider>,
    /// Geocoding sources.
    pub catalogue: Arc<SourceCatalogue>,
    /// Area location suggestions are biased towards.
    pub search_area: SearchArea,
    /// Static filter table.
    pub filters: Arc<FilterTable>,
    /// Building collection.
    pub buildings: Arc<dyn FeatureStore>,
    /// Layout of the building collection.
    pub building_config: BuildingSourceConfig,
    /// Space collection.
    pub spaces: Arc<dyn FeatureStore>,
    /// Layout of the space collection.
    pub space_config: SpaceSourceConfig,
    /// Device-location capability.
    pub location: Arc<dyn LocationCapability>,
}

/// One adapter per [`SuggestionGroup`].
#[derive(Clone)]
pub struct SuggestionSources {
    /// Filter adapter.
    pub filters: Arc<dyn SuggestionSource>,
    /// Space adapter.
    pub spaces: Arc<dyn SuggestionSource>,
    /// On-campus location adapter.
    pub on_campus: Arc<dyn SuggestionSource>,
    /// Building adapter.
    pub buildings: Arc<dyn SuggestionSource>,
    /// Off-campus location adapter.
    pub off_campus: Arc<dyn SuggestionSource>,
    /// My-location adapter.
    pub my_location: Arc<dyn SuggestionSource>,
}

impl SuggestionSources {
    /// Wire the standard adapters to `backends`.
    #[must_use]
    pub fn from_backends(backends: &SearchBackends) -> Self {
        let location = |scope| -> Arc<dyn SuggestionSource> {
            Arc::new(LocationAdapter::new(
                Arc::clone(&backends.geocoder),
                Arc::clone(&backends.catalogue),
                scope,
                backends.search_area,
            ))
        };
        Self {
            filters: Arc::new(FilterAdapter::new(Arc::clone(&backends.filters))),
            spaces: Arc::new(SpaceAdapter::new(
                Arc::clone(&backends.spaces),
                backends.space_config.clone(),
            )),
            on_campus: location(SourceScope::OnCampus),
            buildings: Arc::new(BuildingAdapter::new(
                Arc::clone(&backends.buildings),
                backends.building_config.clone(),
            )),
            off_campus: location(SourceScope::OffCampus),
            my_location: Arc::new(MyLocationAdapter),
        }
    }

    fn get(&self, group: SuggestionGroup) -> &dyn SuggestionSource {
        match group {
            SuggestionGroup::Filters => self.filters.as_ref(),
            SuggestionGroup::Spaces => self.spaces.as_ref(),
            SuggestionGroup::OnCampusLocations => self.on_campus.as_ref(),
            SuggestionGroup::Buildings => self.buildings.as_ref(),
            SuggestionGroup::OffCampusLocations => self.off_campus.as_ref(),
            SuggestionGroup::MyLocation => self.my_location.as_ref(),
        }
    }
}

/// Produces one ordered, de-duplicated suggestion list per query.
#[derive(Clone)]
pub struct SuggestionAggregator {
    sources: SuggestionSources,
    options: AggregatorOptions,
}

impl SuggestionAggregator {
    /// Aggregate over `sources`.
    #[must_use]
    pub const fn new(sources: SuggestionSources, options: AggregatorOptions) -> Self {
        Self { sources, options }
    }

    /// Aggregate over the standard adapters for `backends`.
    #[must_use]
    pub fn from_backends(backends: &SearchBackends, options: AggregatorOptions) -> Self {
        Self::new(SuggestionSources::from_backends(backends), options)
    }

    /// The configured options.
    #[must_use]
    pub const fn options(&self) -> AggregatorOptions {
        self.options
    }

    /// Suggestions for `term`.
    ///
    /// Groups appear in [`SuggestionGroup::ORDER`]. Buildings whose text
    /// matches a location suggestion are dropped. Blank text yields an empty
    /// list without contacting any backend.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::Source`] for the first adapter that fails; no
    /// partial list is produced.
    pub async fn suggest(&self, term: &str) -> Result<Vec<Suggestion>, SuggestError> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        let (filters, spaces, on_campus, buildings, off_campus, my_location) = tokio::try_join!(
            self.collect(SuggestionGroup::Filters, term),
            self.collect(SuggestionGroup::Spaces, term),
            self.collect(SuggestionGroup::OnCampusLocations, term),
            self.collect(SuggestionGroup::Buildings, term),
            self.collect(SuggestionGroup::OffCampusLocations, term),
            self.collect(SuggestionGroup::MyLocation, term),
        )
        .inspect_err(|err| warn!("suggestion batch for {term:?} failed: {err}"))?;
        let merged = merge(GroupedSuggestions {
            filters,
            spaces,
            on_campus,
            buildings,
            off_campus,
            my_location,
        });
        debug!("{} suggestions for {term:?}", merged.len());
        Ok(merged)
    }

    async fn collect(
        &self,
        group: SuggestionGroup,
        term: &str,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        if !self.options.includes(group) {
            return Ok(Vec::new());
        }
        let found = self
            .sources
            .get(group)
            .suggest(term)
            .await
            .map_err(|source| SuggestError::Source { group, source })?;
        debug!("{group} adapter returned {} suggestions", found.len());
        Ok(found)
    }
}

struct GroupedSuggestions {
    filters: Vec<Suggestion>,
    spaces: Vec<Suggestion>,
    on_campus: Vec<Suggestion>,
    buildings: Vec<Suggestion>,
    off_campus: Vec<Suggestion>,
    my_location: Vec<Suggestion>,
}

/// Concatenate groups in display order, eliding buildings that duplicate a
/// canonical location suggestion.
///
/// The canonical locations are the first non-empty location group.
fn merge(groups: GroupedSuggestions) -> Vec<Suggestion> {
    let canonical = if groups.on_campus.is_empty() {
        &groups.off_campus
    } else {
        &groups.on_campus
    };
    let location_texts: HashSet<String> = canonical
        .iter()
        .map(|suggestion| suggestion.text().to_owned())
        .collect();
    let GroupedSuggestions {
        filters,
        spaces,
        on_campus,
        buildings,
        off_campus,
        my_location,
    } = groups;
    let buildings = buildings
        .into_iter()
        .filter(|building| !location_texts.contains(building.text()));
    filters
        .into_iter()
        .chain(spaces)
        .chain(on_campus)
        .chain(buildings)
        .chain(off_campus)
        .chain(my_location)
        .collect()
}
