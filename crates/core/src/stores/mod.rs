pub mod elasticsearch;
pub mod entity_service;

pub use elasticsearch::ElasticsearchClient;
pub use entity_service::EntityServiceLoader;
