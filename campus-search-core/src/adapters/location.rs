//! Geocoder-backed location suggestions.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use log::debug;

use super::SuggestionSource;
use crate::{
    GeocodeProvider, SearchArea, SourceCatalogue, SourceIndex, SourceScope, SuggestRequest,
    Suggestion, TransportError,
};

/// Queries every catalogue source in one scope and merges their suggestions.
///
/// Sources are queried concurrently. Results keep catalogue order, then each
/// source's own order, and are tagged with the source's [`SourceIndex`].
pub struct LocationAdapter {
    geocoder: Arc<dyn GeocodeProvider>,
    catalogue: Arc<SourceCatalogue>,
    scope: SourceScope,
    area: SearchArea,
}

impl LocationAdapter {
    /// Build an adapter over the sources of `catalogue` in `scope`.
    pub fn new(
        geocoder: Arc<dyn GeocodeProvider>,
        catalogue: Arc<SourceCatalogue>,
        scope: SourceScope,
        area: SearchArea,
    ) -> Self {
        Self {
            geocoder,
            catalogue,
            scope,
            area,
        }
    }

    fn request(&self, term: &str) -> SuggestRequest {
        SuggestRequest {
            text: term.to_owned(),
            anchor: self.area.anchor,
            radius_metres: self.area.radius_metres,
            max_suggestions: self.area.max_suggestions,
        }
    }
}

#[async_trait]
impl SuggestionSource for LocationAdapter {
    async fn suggest(&self, term: &str) -> Result<Vec<Suggestion>, TransportError> {
        let request = self.request(term);
        let lookups = self
            .catalogue
            .in_scope(self.scope)
            .map(|(index, source)| {
                let request = &request;
                async move {
                    let found = self.geocoder.suggest(source, request).await?;
                    debug!(
                        "{} returned {} suggestions for {:?}",
                        source.identifier,
                        found.len(),
                        request.text
                    );
                    Ok::<_, TransportError>((index, found))
                }
            });
        let batches = try_join_all(lookups).await?;
        Ok(batches
            .into_iter()
            .flat_map(|(index, found)| {
                found
                    .into_iter()
                    .filter(|suggestion| !suggestion.is_collection)
                    .map(move |suggestion| tag(index, suggestion.text, suggestion.magic_key))
            })
            .collect())
    }
}

fn tag(source_index: SourceIndex, text: String, correlation_key: String) -> Suggestion {
    Suggestion::Location {
        text,
        correlation_key,
        source_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceDescriptor;
    use crate::test_support::StubGeocoder;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalogue() -> Arc<SourceCatalogue> {
        Arc::new(SourceCatalogue::new(vec![
            SourceDescriptor::new("world", "World", "https://world.example", SourceScope::OffCampus),
            SourceDescriptor::new("campus", "Campus", "https://campus.example", SourceScope::OnCampus),
            SourceDescriptor::new("housing", "Housing", "https://housing.example", SourceScope::OnCampus),
        ]))
    }

    #[rstest]
    #[tokio::test]
    async fn merges_sources_in_catalogue_order(catalogue: Arc<SourceCatalogue>) {
        let geocoder = StubGeocoder::new()
            .with_suggestions("housing", ["Orchard Hill"])
            .with_suggestions("campus", ["Old Chapel", "Observatory"])
            .with_suggestions("world", ["Orchard Street"]);
        let adapter = LocationAdapter::new(
            Arc::new(geocoder),
            catalogue,
            SourceScope::OnCampus,
            SearchArea::default(),
        );

        let found = adapter.suggest("o").await.expect("suggest should succeed");

        let tagged: Vec<_> = found
            .iter()
            .map(|suggestion| match suggestion {
                Suggestion::Location {
                    text, source_index, ..
                } => (text.as_str(), source_index.get()),
                other => panic!("unexpected suggestion {other:?}"),
            })
            .collect();
        assert_eq!(
            tagged,
            vec![("Old Chapel", 1), ("Observatory", 1), ("Orchard Hill", 2)]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn requests_are_scoped_to_the_search_area(catalogue: Arc<SourceCatalogue>) {
        let geocoder = Arc::new(StubGeocoder::new());
        let area = SearchArea::default()
            .with_anchor(Coord { x: -72.0, y: 42.0 })
            .with_radius_metres(1_000.0);
        let adapter = LocationAdapter::new(
            geocoder.clone(),
            catalogue,
            SourceScope::OffCampus,
            area,
        );

        adapter.suggest("library").await.expect("suggest should succeed");

        let calls = geocoder.suggest_calls();
        assert_eq!(calls.len(), 1);
        let (source, request) = calls.first().expect("one call");
        assert_eq!(source, "world");
        assert_eq!(request.anchor, Coord { x: -72.0, y: 42.0 });
        assert_eq!(request.radius_metres, 1_000.0);
        assert_eq!(request.text, "library");
    }

    #[rstest]
    #[tokio::test]
    async fn collection_suggestions_are_dropped(catalogue: Arc<SourceCatalogue>) {
        let geocoder = StubGeocoder::new()
            .with_suggestions("world", ["Coffee Shop"])
            .with_collection("world", "Coffee");
        let adapter = LocationAdapter::new(
            Arc::new(geocoder),
            catalogue,
            SourceScope::OffCampus,
            SearchArea::default(),
        );

        let found = adapter.suggest("coffee").await.expect("suggest should succeed");

        let texts: Vec<_> = found.iter().map(Suggestion::text).collect();
        assert_eq!(texts, vec!["Coffee Shop"]);
    }

    #[rstest]
    #[tokio::test]
    async fn one_failing_source_fails_the_adapter(catalogue: Arc<SourceCatalogue>) {
        let geocoder = StubGeocoder::new()
            .with_suggestions("campus", ["Old Chapel"])
            .failing_source(
                "housing",
                TransportError::Timeout {
                    url: "https://housing.example/suggest".into(),
                    timeout_secs: 30,
                },
            );
        let adapter = LocationAdapter::new(
            Arc::new(geocoder),
            catalogue,
            SourceScope::OnCampus,
            SearchArea::default(),
        );

        let err = adapter.suggest("old").await.expect_err("suggest should fail");

        assert!(matches!(err, TransportError::Timeout { .. }));
    }
}
