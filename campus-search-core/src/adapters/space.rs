//! Space suggestions grouped by client.

use std::sync::Arc;

use async_trait::async_trait;

use super::{DEFAULT_LIMIT, SuggestionSource};
use crate::{
    FeatureQuery, FeatureStore, FilterClause, FilterDefinition, Suggestion, TransportError,
    clause::{any_of, contains_clause, equals_clause},
};

/// Layout of the space collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceSourceConfig {
    /// Map layer the generated filter clauses apply to.
    pub layer: String,
    /// Attributes searched for the user's text.
    pub search_fields: Vec<String>,
    /// Attribute naming the client a space is assigned to.
    pub client_field: String,
    /// Maximum number of distinct clients suggested.
    pub limit: usize,
}

impl Default for SpaceSourceConfig {
    fn default() -> Self {
        Self {
            layer: "spaces".to_owned(),
            search_fields: vec!["CLIENT".to_owned()],
            client_field: "CLIENT".to_owned(),
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Suggests clients whose spaces match the user's text.
///
/// Matching spaces are grouped by client: one suggestion per distinct client,
/// in the order clients first appear, each carrying a filter that selects
/// all of that client's spaces.
pub struct SpaceAdapter {
    store: Arc<dyn FeatureStore>,
    config: SpaceSourceConfig,
}

impl SpaceAdapter {
    /// Build an adapter over the space collection `store`.
    pub fn new(store: Arc<dyn FeatureStore>, config: SpaceSourceConfig) -> Self {
        Self { store, config }
    }

    fn query(&self, term: &str) -> FeatureQuery {
        let trimmed = term.trim();
        let clause = any_of(
            self.config
                .search_fields
                .iter()
                .map(|field| contains_clause(field, trimmed)),
        );
        FeatureQuery::new(clause)
            .with_out_fields([self.config.client_field.as_str()])
            .with_order_by([self.config.client_field.as_str()])
    }

    /// `client` is the stored value; the clause must match it exactly.
    fn suggestion(&self, client: &str, count: usize) -> Suggestion {
        let name = client.trim();
        let clause = equals_clause(&self.config.client_field, client);
        let filter = FilterDefinition::new(
            name,
            Vec::new(),
            vec![FilterClause::new(self.config.layer.clone(), clause)],
        );
        Suggestion::Space {
            text: name.to_owned(),
            description: describe(count),
            filter,
        }
    }
}

/// Distinct clients in first-seen order with their counts, capped at `limit`.
///
/// Spaces of clients beyond the cap are ignored; clients already admitted keep
/// counting.
fn group_clients<I>(clients: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut groups: Vec<(String, usize)> = Vec::new();
    for client in clients {
        if let Some((_, count)) = groups.iter_mut().find(|(name, _)| *name == client) {
            *count += 1;
        } else if groups.len() < limit {
            groups.push((client, 1));
        }
    }
    groups
}

fn describe(count: usize) -> String {
    if count == 1 {
        "1 space".to_owned()
    } else {
        format!("{count} spaces")
    }
}

#[async_trait]
impl SuggestionSource for SpaceAdapter {
    async fn suggest(&self, term: &str) -> Result<Vec<Suggestion>, TransportError> {
        let features = self.store.query(&self.query(term)).await?;
        let clients = features
            .iter()
            .filter_map(|feature| feature.stored_text(&self.config.client_field));
        Ok(group_clients(clients, self.config.limit)
            .iter()
            .map(|(client, count)| self.suggestion(client, *count))
            .collect())
    }
}
