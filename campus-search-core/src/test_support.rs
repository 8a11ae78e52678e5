//! In-memory collaborators for tests.
//!
//! These doubles are exported so integration tests and dependent crates can
//! drive the aggregator and resolver without a network.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use geo::{Coord, Geometry, Point};

use crate::{
    AddressCandidate, AttributeValue, CandidateRequest, Clock, Feature, FeatureQuery,
    FeatureStore, GeocodeProvider, GeocodeSuggestion, SourceDescriptor, SuggestRequest,
    TransportError,
};

/// Clock whose reading is set by hand.
///
/// Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Set the reading.
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::Release);
    }

    /// Move the reading forward by `ticks`.
    pub fn advance(&self, ticks: u64) {
        self.now.fetch_add(ticks, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

/// Geocoder answering from canned tables, keyed by source identifier.
///
/// Suggestions registered with [`Self::with_suggestions`] receive keys of the
/// form `"{source}:{n}"`. Candidate lookups answer by key and return nothing
/// for unknown keys.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    suggestions: HashMap<String, Vec<GeocodeSuggestion>>,
    candidates: HashMap<String, Vec<AddressCandidate>>,
    failures: HashMap<String, TransportError>,
    delays: HashMap<String, Duration>,
    suggest_calls: Mutex<Vec<(String, SuggestRequest)>>,
    candidate_calls: Mutex<Vec<(String, CandidateRequest)>>,
}

impl StubGeocoder {
    /// A geocoder that knows nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append place suggestions for `source`.
    #[must_use]
    pub fn with_suggestions<I, S>(mut self, source: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = self.suggestions.entry(source.to_owned()).or_default();
        for text in texts {
            let key = format!("{source}:{}", entries.len());
            entries.push(GeocodeSuggestion::new(text, key));
        }
        self
    }

    /// Append a collection suggestion for `source`.
    #[must_use]
    pub fn with_collection(mut self, source: &str, text: &str) -> Self {
        let entries = self.suggestions.entry(source.to_owned()).or_default();
        let mut suggestion = GeocodeSuggestion::new(text, format!("{source}:{}", entries.len()));
        suggestion.is_collection = true;
        entries.push(suggestion);
        self
    }

    /// Answer candidate lookups for `key`.
    #[must_use]
    pub fn with_candidates(mut self, key: &str, candidates: Vec<AddressCandidate>) -> Self {
        self.candidates.insert(key.to_owned(), candidates);
        self
    }

    /// Fail every call against `source`.
    #[must_use]
    pub fn failing_source(mut self, source: &str, error: TransportError) -> Self {
        self.failures.insert(source.to_owned(), error);
        self
    }

    /// Delay every call against `source`.
    #[must_use]
    pub fn with_delay(mut self, source: &str, delay: Duration) -> Self {
        self.delays.insert(source.to_owned(), delay);
        self
    }

    /// Suggest calls received so far, as `(source identifier, request)`.
    pub fn suggest_calls(&self) -> Vec<(String, SuggestRequest)> {
        self.suggest_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Candidate calls received so far, as `(source identifier, request)`.
    pub fn candidate_calls(&self) -> Vec<(String, CandidateRequest)> {
        self.candidate_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn enter(&self, source: &SourceDescriptor) -> Result<(), TransportError> {
        if let Some(delay) = self.delays.get(&source.identifier) {
            tokio::time::sleep(*delay).await;
        }
        self.failures
            .get(&source.identifier)
            .map_or(Ok(()), |error| Err(error.clone()))
    }
}

#[async_trait]
impl GeocodeProvider for StubGeocoder {
    async fn suggest(
        &self,
        source: &SourceDescriptor,
        request: &SuggestRequest,
    ) -> Result<Vec<GeocodeSuggestion>, TransportError> {
        self.suggest_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((source.identifier.clone(), request.clone()));
        self.enter(source).await?;
        Ok(self
            .suggestions
            .get(&source.identifier)
            .map(|found| found.iter().take(request.max_suggestions).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_candidates(
        &self,
        source: &SourceDescriptor,
        request: &CandidateRequest,
    ) -> Result<Vec<AddressCandidate>, TransportError> {
        self.candidate_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((source.identifier.clone(), request.clone()));
        self.enter(source).await?;
        Ok(self
            .candidates
            .get(&request.magic_key)
            .map(|found| found.iter().take(request.max_locations).cloned().collect())
            .unwrap_or_default())
    }
}

/// Feature store returning a fixed feature list and recording each query.
///
/// The list is truncated to the query's limit but never filtered by its
/// clause.
#[derive(Debug, Default)]
pub struct RecordingFeatureStore {
    features: Vec<Feature>,
    failure: Option<TransportError>,
    queries: Mutex<Vec<FeatureQuery>>,
}

impl RecordingFeatureStore {
    /// Answer every query with `features`.
    #[must_use]
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    /// Fail every query with `error`.
    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// The most recent query.
    pub fn last_query(&self) -> Option<FeatureQuery> {
        self.queries().pop()
    }

    /// Every query received, oldest first.
    pub fn queries(&self) -> Vec<FeatureQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl FeatureStore for RecordingFeatureStore {
    async fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>, TransportError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(self.features.iter().take(limit).cloned().collect())
    }
}

/// A feature with one text attribute and a point geometry.
pub fn named_point(field: &str, name: &str, at: Coord<f64>) -> Feature {
    Feature {
        attributes: HashMap::from([(field.to_owned(), AttributeValue::from(name))]),
        geometry: Some(Geometry::Point(Point::from(at))),
    }
}

/// A feature with one text attribute and no geometry.
pub fn attributes_only(field: &str, value: &str) -> Feature {
    Feature {
        attributes: HashMap::from([(field.to_owned(), AttributeValue::from(value))]),
        geometry: None,
    }
}
