use clap::Parser;
use mediquery::api::create_router;
use mediquery::api::handlers::AppState;
use mediquery::config;
use mediquery::corpus::{Corpus, CorpusConfig};
use mediquery::engine::SearchEngine;
use mediquery::expand::{ExpansionClient, ExpansionConfig};
use mediquery::normalize::Normalizer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mediquery", about = "Boolean-query document search service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Path to the corpus CSV file (header row required)
    #[arg(short, long)]
    corpus: PathBuf,

    /// Comma-separated raw fields scanned by boolean filtering
    #[arg(long, default_value = config::DEFAULT_SEARCH_FIELDS)]
    search_fields: String,

    /// Comma-separated fields normalized into the ranked-search text
    #[arg(long, default_value = config::DEFAULT_TEXT_FIELDS)]
    text_fields: String,

    /// Default number of ranked results per query
    #[arg(long, default_value_t = config::DEFAULT_TOP_K)]
    top_k: usize,

    /// Base URL of the term-expansion service (omit to disable expansion).
    /// Credentials come from MEDIQUERY_CLIENT_ID / MEDIQUERY_CLIENT_SECRET.
    #[arg(long)]
    expansion_url: Option<String>,
}

fn parse_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mediquery=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let corpus_config = CorpusConfig {
        search_fields: parse_fields(&args.search_fields),
        text_fields: parse_fields(&args.text_fields),
    };
    if corpus_config.search_fields.is_empty() || corpus_config.text_fields.is_empty() {
        eprintln!("Error: --search-fields and --text-fields must name at least one field");
        std::process::exit(1);
    }

    let normalizer = Normalizer::default();

    // A missing or empty corpus is fatal: the service must not start
    // serving with nothing to search.
    let corpus = match Corpus::from_csv_path(&args.corpus, corpus_config.clone(), &normalizer) {
        Ok(corpus) => corpus,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let expansion = match args.expansion_url {
        Some(url) => {
            let client_id = std::env::var("MEDIQUERY_CLIENT_ID").ok();
            let client_secret = std::env::var("MEDIQUERY_CLIENT_SECRET").ok();
            match (client_id, client_secret) {
                (Some(id), Some(secret)) => {
                    tracing::info!(url = %url, "term expansion enabled");
                    Some(ExpansionClient::new(ExpansionConfig::new(url, id, secret))?)
                }
                _ => {
                    tracing::warn!(
                        "expansion URL set but MEDIQUERY_CLIENT_ID/MEDIQUERY_CLIENT_SECRET \
                         missing; term expansion disabled"
                    );
                    None
                }
            }
        }
        None => None,
    };

    let document_count = corpus.len();
    let engine = Arc::new(SearchEngine::new(corpus, normalizer, expansion, args.top_k));

    let state = AppState {
        engine,
        corpus_path: Some(args.corpus.clone()),
        corpus_config,
        start_time: Instant::now(),
    };
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        corpus = %args.corpus.display(),
        documents = document_count,
        search_fields = %args.search_fields,
        top_k = args.top_k,
        "mediquery ready"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
