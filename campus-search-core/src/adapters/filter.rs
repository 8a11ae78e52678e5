//! Suggestions from the static filter table.

use std::sync::Arc;

use async_trait::async_trait;

use super::{DEFAULT_LIMIT, SuggestionSource, tokens};
use crate::{FilterTable, Suggestion, TransportError};

/// Matches user text against filter keywords.
///
/// A filter matches when every token of the text prefixes one of its
/// keywords, ignoring case. No backend is contacted.
pub struct FilterAdapter {
    table: Arc<FilterTable>,
    limit: usize,
}

impl FilterAdapter {
    /// Build an adapter over `table` with the default cap.
    #[must_use]
    pub const fn new(table: Arc<FilterTable>) -> Self {
        Self {
            table,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Matching filters in table order, capped.
    #[must_use]
    pub fn matches(&self, term: &str) -> Vec<Suggestion> {
        let tokens = tokens(term);
        self.table
            .iter()
            .filter(|filter| filter.matches(&tokens))
            .take(self.limit)
            .map(|filter| Suggestion::Filter {
                text: filter.name.clone(),
                filter: filter.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl SuggestionSource for FilterAdapter {
    async fn suggest(&self, term: &str) -> Result<Vec<Suggestion>, TransportError> {
        Ok(self.matches(term))
    }
}
