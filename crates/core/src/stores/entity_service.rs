use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::error::SearchError;
use crate::models::ResolvedInstance;
use crate::traits::InstanceNameLoader;

// Fetch profile: only the key and display name come back.
const INSTANCE_NAME_FETCH_PLAN: &str = "_instance_name";

/// Loads display names from an entity service that applies row-level access
/// control and leaves forbidden or deleted records out of its response.
pub struct EntityServiceLoader {
    endpoint: String,
    client: Client,
}

impl EntityServiceLoader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    fn load_url(&self) -> Result<Url, SearchError> {
        Ok(Url::parse(&format!("{}/load", self.endpoint))?)
    }
}

#[async_trait]
impl InstanceNameLoader for EntityServiceLoader {
    async fn load_instance_names(
        &self,
        entity_name: &str,
        keys: &[String],
    ) -> Result<Vec<ResolvedInstance>, SearchError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(self.load_url()?)
            .json(&json!({
                "entity": entity_name,
                "ids": keys,
                "fetchPlan": INSTANCE_NAME_FETCH_PLAN,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "entity-service".to_string(),
                details: response.status().to_string(),
            });
        }

        let body: Value = response.json().await?;
        Ok(parse_loaded_instances(&body))
    }
}

pub fn parse_loaded_instances(body: &Value) -> Vec<ResolvedInstance> {
    body.as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let key = row.pointer("/id").and_then(Value::as_str)?;
                    let instance_name = row.pointer("/instanceName").and_then(Value::as_str)?;
                    Some(ResolvedInstance {
                        key: key.to_string(),
                        instance_name: instance_name.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
