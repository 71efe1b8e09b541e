pub mod error;
pub mod id;
pub mod models;
pub mod request;
pub mod searcher;
pub mod stores;
pub mod strategy;
pub mod traits;

pub use error::SearchError;
pub use id::DocumentId;
pub use models::{
    FieldHit, HighlightedField, RawHit, ResolvedInstance, SearchConfig, SearchContext,
    SearchResponse, SearchResult, SearchResultEntry, DEFAULT_PAGE_SIZE,
};
pub use request::{build_request, index_name, HighlightConfig, SearchRequest};
pub use searcher::EntitySearcher;
pub use stores::{ElasticsearchClient, EntityServiceLoader};
pub use strategy::{
    AllTermsAnyFieldStrategy, AllTermsSingleFieldStrategy, AnyTermAnyFieldStrategy,
    PhraseStrategy, SearchStrategy, SearchStrategyRegistry,
};
pub use traits::{InstanceNameLoader, SearchClient};
