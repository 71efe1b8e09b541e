use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::models::{SearchConfig, SearchContext};
use crate::request::SearchRequest;

/// Encodes one kind of match semantics into a draft request; the builder
/// applies paging and highlighting afterwards.
pub trait SearchStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn configure_request(&self, request: &mut SearchRequest, context: &SearchContext);
}

/// Matches documents containing at least one query term in any field.
pub struct AnyTermAnyFieldStrategy;

impl SearchStrategy for AnyTermAnyFieldStrategy {
    fn name(&self) -> &str {
        "anyTermAnyField"
    }

    fn configure_request(&self, request: &mut SearchRequest, context: &SearchContext) {
        request.query = Some(json!({
            "multi_match": {
                "query": context.query_text,
                "fields": ["*"],
            }
        }));
    }
}

/// Matches documents containing every query term, terms may land in
/// different fields.
pub struct AllTermsAnyFieldStrategy;

impl SearchStrategy for AllTermsAnyFieldStrategy {
    fn name(&self) -> &str {
        "allTermsAnyField"
    }

    fn configure_request(&self, request: &mut SearchRequest, context: &SearchContext) {
        request.query = Some(json!({
            "simple_query_string": {
                "query": context.query_text,
                "default_operator": "and",
            }
        }));
    }
}

/// Matches documents containing every query term within one field.
pub struct AllTermsSingleFieldStrategy;

impl SearchStrategy for AllTermsSingleFieldStrategy {
    fn name(&self) -> &str {
        "allTermsSingleField"
    }

    fn configure_request(&self, request: &mut SearchRequest, context: &SearchContext) {
        request.query = Some(json!({
            "multi_match": {
                "query": context.query_text,
                "fields": ["*"],
                "operator": "and",
            }
        }));
    }
}

/// Matches documents containing the query terms as a phrase, in order.
pub struct PhraseStrategy;

impl SearchStrategy for PhraseStrategy {
    fn name(&self) -> &str {
        "phrase"
    }

    fn configure_request(&self, request: &mut SearchRequest, context: &SearchContext) {
        request.query = Some(json!({
            "multi_match": {
                "query": context.query_text,
                "fields": ["*"],
                "type": "phrase",
            }
        }));
    }
}

/// Strategies kept executable for old saved searches but hidden from
/// UI-facing listings.
const DEPRECATED_SEARCH_STRATEGIES: [&str; 2] = ["allTermsAnyField", "allTermsSingleField"];

/// Starts with the built-in set; hosts may register their own.
pub struct SearchStrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn SearchStrategy>>,
}

impl SearchStrategyRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: BTreeMap::new(),
        };
        registry.register(Arc::new(AnyTermAnyFieldStrategy));
        registry.register(Arc::new(AllTermsAnyFieldStrategy));
        registry.register(Arc::new(AllTermsSingleFieldStrategy));
        registry.register(Arc::new(PhraseStrategy));
        registry
    }

    pub fn register(&mut self, strategy: Arc<dyn SearchStrategy>) {
        self.strategies.insert(strategy.name().to_string(), strategy);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SearchStrategy>> {
        self.strategies.get(name).cloned()
    }

    pub fn default_strategy(&self, config: &SearchConfig) -> Option<Arc<dyn SearchStrategy>> {
        self.get(&config.default_strategy)
    }

    /// Strategies suitable for listing to users, deprecated ones excluded.
    pub fn visible(&self) -> Vec<Arc<dyn SearchStrategy>> {
        self.strategies
            .values()
            .filter(|strategy| !DEPRECATED_SEARCH_STRATEGIES.contains(&strategy.name()))
            .cloned()
            .collect()
    }
}

impl Default for SearchStrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
