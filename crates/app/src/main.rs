use chrono::Utc;
use clap::{Parser, Subcommand};
use entity_search_core::{
    ElasticsearchClient, EntitySearcher, EntityServiceLoader, SearchConfig, SearchContext,
    SearchResult,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "entity-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Elasticsearch base URL
    #[arg(long, env = "ES_URL", default_value = "http://localhost:9200")]
    es_url: String,

    /// Entity service base URL used to resolve instance names
    #[arg(long, env = "ENTITY_SERVICE_URL", default_value = "http://localhost:8080/rest/entities")]
    entity_service_url: String,

    /// Prefix shared by all search index names
    #[arg(long, default_value = "search_index_")]
    index_prefix: String,

    /// Maximum ids per instance-name reload request
    #[arg(long, default_value = "100")]
    reload_batch_size: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a search and print the assembled result page(s).
    Search {
        /// Search query
        #[arg(long)]
        query: String,
        /// Entity to search; repeat for several, omit for all.
        #[arg(long = "entity")]
        entities: Vec<String>,
        /// Entries per page.
        #[arg(long, default_value = "10")]
        size: usize,
        /// Raw hit offset to start from.
        #[arg(long, default_value = "0")]
        offset: usize,
        /// Search strategy name.
        #[arg(long, default_value = "anyTermAnyField")]
        strategy: String,
        /// Number of pages to follow through continuation.
        #[arg(long, default_value = "1")]
        pages: usize,
    },
    /// List the search strategies available for selection.
    Strategies,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = SearchConfig {
        index_prefix: cli.index_prefix.clone(),
        reload_batch_size: cli.reload_batch_size,
        ..SearchConfig::default()
    };
    let client = ElasticsearchClient::new(&cli.es_url);
    let loader = EntityServiceLoader::new(&cli.entity_service_url);
    let searcher = EntitySearcher::new(client, loader, config);

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "entity-search boot"
    );

    match cli.command {
        Command::Search {
            query,
            entities,
            size,
            offset,
            strategy,
            pages,
        } => {
            let context = SearchContext::new(query)
                .with_entities(entities)
                .with_size(size)
                .with_offset(offset);

            let mut result = searcher.search_by_name(&context, &strategy).await?;
            print_page(&result, 1);

            let mut page = 1;
            while page < pages && result.more_data_available() {
                result = searcher.search_next_page(&result).await?;
                page += 1;
                print_page(&result, page);
            }

            if result.more_data_available() {
                println!(
                    "more matches available, continue with --offset {}",
                    result.effective_offset()
                );
            }
        }
        Command::Strategies => {
            for strategy in searcher.registry().visible() {
                println!("{}", strategy.name());
            }
        }
    }

    Ok(())
}

fn print_page(result: &SearchResult, page: usize) {
    println!(
        "page {} ({} entries, inspected through offset {})",
        page,
        result.size(),
        result.effective_offset()
    );
    for entry in result.entries() {
        println!(
            "[{}] {} (id={})",
            entry.entity_name, entry.instance_name, entry.doc_id
        );
        for field_hit in &entry.field_hits {
            println!("  {}: {}", field_hit.field, field_hit.highlights);
        }
    }
}
