//! Named map filters and the static table they are looked up in.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An attribute-query clause applied to one map layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterClause {
    /// Layer the clause applies to.
    pub layer: String,
    /// Attribute-query `WHERE` clause.
    pub where_clause: String,
}

impl FilterClause {
    /// Construct a clause for `layer`.
    pub fn new(layer: impl Into<String>, where_clause: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            where_clause: where_clause.into(),
        }
    }
}

/// A named filter such as "Parking" or "Dining".
///
/// # Examples
///
/// ```
/// use campus_search_core::FilterDefinition;
///
/// let filter = FilterDefinition::new("Accessible Entrances", Vec::new(), Vec::new());
/// assert_eq!(filter.keywords(), vec!["accessible", "entrances"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterDefinition {
    /// Display name.
    pub name: String,
    /// Search keywords; when empty the words of `name` are used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    /// Clauses applied when the filter is selected.
    #[cfg_attr(feature = "serde", serde(default))]
    pub clauses: Vec<FilterClause>,
}

impl FilterDefinition {
    /// Construct a filter definition.
    pub fn new(name: impl Into<String>, tags: Vec<String>, clauses: Vec<FilterClause>) -> Self {
        Self {
            name: name.into(),
            tags,
            clauses,
        }
    }

    /// Lowercased keywords matched against user input.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        if self.tags.is_empty() {
            self.name.split_whitespace().map(str::to_lowercase).collect()
        } else {
            self.tags.iter().map(|tag| tag.to_lowercase()).collect()
        }
    }

    /// Whether every token prefixes at least one keyword.
    ///
    /// Tokens must already be lowercased. An empty token list never matches.
    #[must_use]
    pub fn matches(&self, tokens: &[String]) -> bool {
        if tokens.is_empty() {
            return false;
        }
        let keywords = self.keywords();
        tokens.iter().all(|token| {
            keywords
                .iter()
                .any(|keyword| keyword.starts_with(token.as_str()))
        })
    }
}

/// The in-memory table of named filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct FilterTable {
    filters: Vec<FilterDefinition>,
}

impl FilterTable {
    /// Build a table preserving the order of `filters`.
    #[must_use]
    pub const fn new(filters: Vec<FilterDefinition>) -> Self {
        Self { filters }
    }

    /// Iterate over the filters in table order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterDefinition> + '_ {
        self.filters.iter()
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
