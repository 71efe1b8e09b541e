use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::SearchError;
use crate::id::DocumentId;
use crate::models::{
    FieldHit, RawHit, SearchConfig, SearchContext, SearchResult, SearchResultEntry,
};
use crate::request::build_request;
use crate::strategy::{SearchStrategy, SearchStrategyRegistry};
use crate::traits::{InstanceNameLoader, SearchClient};

// Synthetic marker the indexer appends to the display-name subfield.
const INSTANCE_NAME_FIELD_SUFFIX: &str = "._instance_name";

const FRAGMENT_SEPARATOR: &str = "...";

/// Drives paged backend queries and reconciles the hits with the system of
/// record. Reconciliation can drop hits whose records are gone or not
/// visible, so the searcher keeps fetching until the caller's page is full
/// or the backend runs out of matches.
pub struct EntitySearcher<C, L>
where
    C: SearchClient,
    L: InstanceNameLoader,
{
    client: C,
    loader: L,
    registry: SearchStrategyRegistry,
    config: SearchConfig,
}

impl<C, L> EntitySearcher<C, L>
where
    C: SearchClient + Send + Sync,
    L: InstanceNameLoader + Send + Sync,
{
    pub fn new(client: C, loader: L, config: SearchConfig) -> Self {
        Self {
            client,
            loader,
            registry: SearchStrategyRegistry::new(),
            config,
        }
    }

    pub fn with_registry(mut self, registry: SearchStrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &SearchStrategyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// `more_data_available` reflects the backend state alone, so it can be
    /// true even though this call stopped because the page filled up.
    pub async fn search(
        &self,
        context: &SearchContext,
        strategy: &dyn SearchStrategy,
    ) -> Result<SearchResult, SearchError> {
        debug!(
            query = %context.query_text,
            strategy = strategy.name(),
            size = context.size,
            offset = context.offset,
            "performing search"
        );
        let mut result = SearchResult::new(context.clone(), strategy.name());
        let mut request = build_request(context, strategy, &self.config);

        let more_data_available = loop {
            request.from = result.effective_offset();
            debug!(from = request.from, indices = ?request.indices, "search request");
            let response = self.client.search(&request).await?;

            let grouped = group_hits_by_entity(&response.hits)?;
            self.fill_search_result(&mut result, grouped).await?;

            let more = response.total > result.effective_offset() as u64;
            if !more || result.size() >= context.size {
                break more;
            }
        };

        result.set_more_data_available(more_data_available);
        Ok(result)
    }

    pub async fn search_by_name(
        &self,
        context: &SearchContext,
        strategy_name: &str,
    ) -> Result<SearchResult, SearchError> {
        let strategy = self.resolve_strategy(strategy_name)?;
        self.search(context, strategy.as_ref()).await
    }

    pub async fn search_next_page(
        &self,
        previous: &SearchResult,
    ) -> Result<SearchResult, SearchError> {
        let strategy = self.resolve_strategy(previous.strategy_name())?;
        let context = previous.create_next_page_search_context();
        self.search(&context, strategy.as_ref()).await
    }

    fn resolve_strategy(&self, strategy_name: &str) -> Result<Arc<dyn SearchStrategy>, SearchError> {
        self.registry.get(strategy_name).ok_or_else(|| {
            SearchError::Request(format!("unknown search strategy '{strategy_name}'"))
        })
    }

    /// Every inspected hit advances the cursor; inspection stops entirely
    /// once the page is full.
    async fn fill_search_result(
        &self,
        result: &mut SearchResult,
        grouped: Vec<(String, Vec<&RawHit>)>,
    ) -> Result<(), SearchError> {
        let size_limit = result.context().size;
        for (entity_name, hits) in grouped {
            let mut keys = Vec::with_capacity(hits.len());
            for hit in &hits {
                keys.push(DocumentId::parse(&hit.id)?.key);
            }
            let resolved = self.load_instance_names(&entity_name, &keys).await?;

            for hit in hits {
                if result.size() >= size_limit {
                    return Ok(());
                }
                match resolved.get(&hit.id) {
                    Some(instance_name) => {
                        result.add_entry(create_search_result_entry(hit, instance_name, &entity_name));
                    }
                    None => {
                        debug!(doc_id = %hit.id, "hit dropped, record missing or not visible");
                    }
                }
                result.increment_offset();
            }
        }
        Ok(())
    }

    // Map is keyed by the re-encoded document id string.
    async fn load_instance_names(
        &self,
        entity_name: &str,
        keys: &[String],
    ) -> Result<HashMap<String, String>, SearchError> {
        let batch_size = self.config.reload_batch_size.max(1);
        let mut resolved = HashMap::new();
        for batch in keys.chunks(batch_size) {
            debug!(entity = entity_name, count = batch.len(), "loading instance names");
            let instances = self.loader.load_instance_names(entity_name, batch).await?;
            for instance in instances {
                resolved.insert(
                    DocumentId::new(entity_name, &instance.key).to_string(),
                    instance.instance_name,
                );
            }
        }
        Ok(resolved)
    }
}

// Groups in first-seen order; an undecodable hit id aborts the call.
fn group_hits_by_entity(hits: &[RawHit]) -> Result<Vec<(String, Vec<&RawHit>)>, SearchError> {
    let mut groups: Vec<(String, Vec<&RawHit>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for hit in hits {
        let doc_id = DocumentId::parse(&hit.id)?;
        match positions.get(&doc_id.entity_name) {
            Some(&position) => groups[position].1.push(hit),
            None => {
                positions.insert(doc_id.entity_name.clone(), groups.len());
                groups.push((doc_id.entity_name, vec![hit]));
            }
        }
    }
    Ok(groups)
}

fn create_search_result_entry(
    hit: &RawHit,
    instance_name: &str,
    entity_name: &str,
) -> SearchResultEntry {
    let field_hits = hit
        .highlights
        .iter()
        .map(|highlighted| FieldHit {
            field: format_field_name(&highlighted.field).to_string(),
            highlights: highlighted.fragments.join(FRAGMENT_SEPARATOR),
        })
        .collect();

    SearchResultEntry {
        doc_id: hit.id.clone(),
        instance_name: instance_name.to_string(),
        entity_name: entity_name.to_string(),
        field_hits,
    }
}

fn format_field_name(field_name: &str) -> &str {
    field_name
        .strip_suffix(INSTANCE_NAME_FIELD_SUFFIX)
        .unwrap_or(field_name)
}
