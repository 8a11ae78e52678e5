//! The device-location suggestion.

use async_trait::async_trait;

use super::{SuggestionSource, tokens};
use crate::{Suggestion, TransportError};

const TRIGGER_WORDS: [&str; 2] = ["my", "me"];

/// Offers "My location" when the text contains the word "my" or "me".
///
/// Matching is by whole token, so "meter" does not trigger it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyLocationAdapter;

impl MyLocationAdapter {
    /// Whether `term` asks for the device location.
    #[must_use]
    pub fn is_triggered(term: &str) -> bool {
        tokens(term)
            .iter()
            .any(|token| TRIGGER_WORDS.contains(&token.as_str()))
    }
}

#[async_trait]
impl SuggestionSource for MyLocationAdapter {
    async fn suggest(&self, term: &str) -> Result<Vec<Suggestion>, TransportError> {
        if Self::is_triggered(term) {
            Ok(vec![Suggestion::my_location()])
        } else {
            Ok(Vec::new())
        }
    }
}
