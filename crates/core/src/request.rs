use serde_json::{json, Map, Value};

use crate::models::{SearchConfig, SearchContext};
use crate::strategy::SearchStrategy;

/// The default highlights every field with `<b>` tags and only marks terms
/// that matched the query in that very field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    pub field_pattern: String,
    pub pre_tag: String,
    pub post_tag: String,
    pub require_field_match: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            field_pattern: "*".to_string(),
            pre_tag: "<b>".to_string(),
            post_tag: "</b>".to_string(),
            require_field_match: true,
        }
    }
}

/// Built once per search call; the engine only moves `from` between fetches.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub indices: Vec<String>,
    /// Missing or closed indices among the targets are skipped, not failed.
    pub lenient: bool,
    pub query: Option<Value>,
    pub from: usize,
    pub size: usize,
    pub highlight: Option<HighlightConfig>,
}

impl SearchRequest {
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.clone());
        }
        body.insert("from".to_string(), json!(self.from));
        body.insert("size".to_string(), json!(self.size));
        if let Some(highlight) = &self.highlight {
            let mut fields = Map::new();
            fields.insert(highlight.field_pattern.clone(), json!({}));
            body.insert(
                "highlight".to_string(),
                json!({
                    "fields": Value::Object(fields),
                    "pre_tags": [highlight.pre_tag],
                    "post_tags": [highlight.post_tag],
                    "require_field_match": highlight.require_field_match,
                }),
            );
        }
        Value::Object(body)
    }
}

pub fn index_name(prefix: &str, entity_name: &str) -> String {
    format!("{}{}", prefix, entity_name.to_lowercase())
}

/// The strategy owns the match semantics; page size and the fallback
/// highlighter are applied afterwards.
pub fn build_request(
    context: &SearchContext,
    strategy: &dyn SearchStrategy,
    config: &SearchConfig,
) -> SearchRequest {
    let mut request = base_request(context, config);
    strategy.configure_request(&mut request, context);
    request.size = context.size;
    if request.highlight.is_none() {
        request.highlight = Some(HighlightConfig::default());
    }
    request
}

fn base_request(context: &SearchContext, config: &SearchConfig) -> SearchRequest {
    let indices = if context.entities.is_empty() {
        vec![format!("{}*", config.index_prefix)]
    } else {
        context
            .entities
            .iter()
            .map(|entity_name| index_name(&config.index_prefix, entity_name))
            .collect()
    };

    SearchRequest {
        indices,
        lenient: true,
        query: None,
        from: 0,
        size: 0,
        highlight: None,
    }
}
