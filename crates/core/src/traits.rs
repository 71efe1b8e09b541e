use async_trait::async_trait;

use crate::error::SearchError;
use crate::models::{ResolvedInstance, SearchResponse};
use crate::request::SearchRequest;

#[async_trait]
pub trait SearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}

/// Keys the caller cannot see, or that no longer exist, are omitted from the
/// response; absence is the only signal.
#[async_trait]
pub trait InstanceNameLoader {
    async fn load_instance_names(
        &self,
        entity_name: &str,
        keys: &[String],
    ) -> Result<Vec<ResolvedInstance>, SearchError>;
}
