use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchContext {
    pub query_text: String,
    /// Empty means every known index.
    pub entities: Vec<String>,
    pub size: usize,
    pub offset: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

impl SearchContext {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            entities: Vec::new(),
            size: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }

    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Prefix of every search index name; the wildcard target is `{prefix}*`.
    pub index_prefix: String,
    /// Upper bound on one instance-name reload request.
    pub reload_batch_size: usize,
    pub default_strategy: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_prefix: "search_index_".to_string(),
            reload_batch_size: 100,
            default_strategy: "anyTermAnyField".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighlightedField {
    pub field: String,
    pub fragments: Vec<String>,
}

/// One document matched by the backend, before reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHit {
    pub id: String,
    pub score: f64,
    pub highlights: Vec<HighlightedField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedInstance {
    pub key: String,
    pub instance_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldHit {
    pub field: String,
    pub highlights: String,
}

/// Only ever created for hits whose underlying record was resolved by the
/// loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultEntry {
    pub doc_id: String,
    pub instance_name: String,
    pub entity_name: String,
    pub field_hits: Vec<FieldHit>,
}

/// One page of entries plus the continuation state for the next page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    context: SearchContext,
    strategy_name: String,
    entries: Vec<SearchResultEntry>,
    effective_offset: usize,
    more_data_available: bool,
}

impl SearchResult {
    pub fn new(context: SearchContext, strategy_name: impl Into<String>) -> Self {
        let effective_offset = context.offset;
        Self {
            context,
            strategy_name: strategy_name.into(),
            entries: Vec::new(),
            effective_offset,
            more_data_available: false,
        }
    }

    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn entries(&self) -> &[SearchResultEntry] {
        &self.entries
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw hits inspected so far, kept or dropped. The next page starts here.
    pub fn effective_offset(&self) -> usize {
        self.effective_offset
    }

    pub fn more_data_available(&self) -> bool {
        self.more_data_available
    }

    pub(crate) fn add_entry(&mut self, entry: SearchResultEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn increment_offset(&mut self) {
        self.effective_offset += 1;
    }

    pub(crate) fn set_more_data_available(&mut self, more_data_available: bool) {
        self.more_data_available = more_data_available;
    }

    pub fn create_next_page_search_context(&self) -> SearchContext {
        self.context.clone().with_offset(self.effective_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_context_starts_at_cursor_not_entry_count() {
        let context = SearchContext::new("pump").with_size(5);
        let mut result = SearchResult::new(context, "anyTermAnyField");
        for _ in 0..8 {
            result.increment_offset();
        }
        result.add_entry(SearchResultEntry {
            doc_id: "demo_Customer-1".to_string(),
            instance_name: "First".to_string(),
            entity_name: "demo_Customer".to_string(),
            field_hits: Vec::new(),
        });

        let next = result.create_next_page_search_context();
        assert_eq!(next.offset, 8);
        assert_eq!(next.query_text, "pump");
        assert_eq!(next.size, 5);
    }

    #[test]
    fn result_preserves_starting_offset_from_context() {
        let context = SearchContext::new("pump").with_offset(20);
        let result = SearchResult::new(context, "phrase");
        assert_eq!(result.effective_offset(), 20);
        assert!(!result.more_data_available());
        assert!(result.is_empty());
    }
}
