use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::SearchError;
use crate::models::{HighlightedField, RawHit, SearchResponse};
use crate::request::SearchRequest;
use crate::traits::SearchClient;

pub struct ElasticsearchClient {
    endpoint: String,
    client: Client,
}

impl ElasticsearchClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    fn search_url(&self, request: &SearchRequest) -> Result<Url, SearchError> {
        let mut url = Url::parse(&format!(
            "{}/{}/_search",
            self.endpoint,
            request.indices.join(",")
        ))?;
        if request.lenient {
            url.query_pairs_mut()
                .append_pair("ignore_unavailable", "true")
                .append_pair("allow_no_indices", "true")
                .append_pair("expand_wildcards", "open");
        }
        Ok(url)
    }
}

#[async_trait]
impl SearchClient for ElasticsearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .post(self.search_url(request)?)
            .json(&request.to_body())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "elasticsearch".to_string(),
                details: response.status().to_string(),
            });
        }

        let body: Value = response.json().await?;
        parse_search_response(&body)
    }
}

pub fn parse_search_response(body: &Value) -> Result<SearchResponse, SearchError> {
    // `hits.total` is an object on 7.x and a bare number on older clusters.
    let total = body
        .pointer("/hits/total/value")
        .and_then(Value::as_u64)
        .or_else(|| body.pointer("/hits/total").and_then(Value::as_u64))
        .ok_or_else(|| SearchError::BackendResponse {
            backend: "elasticsearch".to_string(),
            details: "missing hits.total".to_string(),
        })?;

    let raw_hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut hits = Vec::new();
    for raw in raw_hits {
        let id = raw
            .pointer("/_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let score = raw.pointer("/_score").and_then(Value::as_f64).unwrap_or(0.0);

        let mut highlights = Vec::new();
        if let Some(fields) = raw.pointer("/highlight").and_then(Value::as_object) {
            for (field, fragments) in fields {
                let fragments = fragments
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                highlights.push(HighlightedField {
                    field: field.clone(),
                    fragments,
                });
            }
        }

        hits.push(RawHit {
            id,
            score,
            highlights,
        });
    }

    Ok(SearchResponse { total, hits })
}
