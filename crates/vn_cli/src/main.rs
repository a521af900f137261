use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use vn_core::{IngestOutcome, PostStore, Result};
use vn_rewrite::{DummyModel, GeminiModel, Rewriter, TextModel};
use vn_scrapers::assets::{AssetHost, AssetResolver, PassthroughHost};
use vn_scrapers::cloudinary::CloudinaryHost;
use vn_scrapers::feeds;
use vn_scrapers::fetch::Fetcher;
use vn_scrapers::profiles::known_profiles;
use vn_scrapers::IngestPipeline;
use vn_storage::{MemoryStore, SqliteStore};
use vn_web::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vietnamese news ingestion pipeline", long_about = None)]
struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, default_value = "sqlite")]
    storage: String,

    /// Path to the SQLite database file
    #[arg(long, default_value = "posts.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a single article URL
    Ingest { url: String },
    /// Discover articles on a known source's front page and ingest them
    Crawl {
        /// Source short name, e.g. vnexpress
        source: String,
        /// Maximum number of articles to ingest
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Discover articles from an RSS feed and ingest them
    Feed {
        feed_url: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// List the configured sources
    Sources,
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: String,
    },
}

async fn create_store(kind: &str, db_path: &Path) -> Result<Arc<dyn PostStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "sqlite" => Ok(Arc::new(SqliteStore::new(db_path).await?)),
        other => Err(vn_core::Error::Storage(format!(
            "unknown storage backend: {}",
            other
        ))),
    }
}

fn create_rewriter() -> Rewriter {
    let model: Arc<dyn TextModel> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => match GeminiModel::new(key) {
            Ok(model) => Arc::new(model),
            Err(e) => {
                warn!("failed to build Gemini client ({}), using dummy model", e);
                Arc::new(DummyModel)
            }
        },
        _ => {
            warn!("GEMINI_API_KEY not set, rewrite runs with the dummy model");
            Arc::new(DummyModel)
        }
    };
    Rewriter::new(model)
}

fn create_asset_host() -> Arc<dyn AssetHost> {
    let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default();
    let upload_preset = std::env::var("CLOUDINARY_UPLOAD_PRESET").unwrap_or_default();
    if cloud_name.is_empty() || upload_preset.is_empty() {
        warn!("Cloudinary credentials not set, keeping publisher image URLs");
        return Arc::new(PassthroughHost);
    }
    Arc::new(CloudinaryHost::new(cloud_name, upload_preset))
}

fn report(outcome: IngestOutcome) {
    match outcome {
        IngestOutcome::Persisted(record) => {
            info!("persisted: {} ({})", record.title, record.slug)
        }
        IngestOutcome::Duplicate { title } => info!("skipped duplicate: {}", title),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let store = create_store(&cli.storage, &cli.db_path).await?;
    info!("storage initialized ({})", cli.storage);

    let fetcher = Fetcher::new()?;
    let pipeline = Arc::new(IngestPipeline::new(
        fetcher.clone(),
        known_profiles(),
        AssetResolver::new(create_asset_host()),
        create_rewriter(),
        store.clone(),
    ));

    match cli.command {
        Commands::Ingest { url } => {
            report(pipeline.ingest(&url).await?);
        }
        Commands::Crawl { source, limit } => {
            let needle = source.to_lowercase();
            let profile = pipeline
                .profiles()
                .iter()
                .find(|p| p.cli_name == needle)
                .ok_or_else(|| {
                    vn_core::Error::InvalidUrl(format!("unknown source: {}", source))
                })?;

            let urls = pipeline.discover(profile).await?;
            info!("found {} article links on {}", urls.len(), profile.name);
            for url in urls.into_iter().take(limit) {
                match pipeline.ingest(&url).await {
                    Ok(outcome) => report(outcome),
                    Err(e) => error!("failed to ingest {}: {}", url, e),
                }
            }
        }
        Commands::Feed { feed_url, limit } => {
            let articles = feeds::fetch_feed(fetcher.client(), &feed_url).await?;
            info!("feed has {} entries", articles.len());
            for article in articles.into_iter().take(limit) {
                if article.link.is_empty() {
                    continue;
                }
                match pipeline.ingest(&article.link).await {
                    Ok(outcome) => report(outcome),
                    Err(e) => error!("failed to ingest {}: {}", article.link, e),
                }
            }
        }
        Commands::Sources => {
            for profile in pipeline.profiles() {
                println!(
                    "{:<12} {} ({})",
                    profile.cli_name,
                    profile.name,
                    profile.url_matchers.join(", ")
                );
            }
        }
        Commands::Serve { addr } => {
            let app = vn_web::create_app(AppState {
                store: store.clone(),
                pipeline: pipeline.clone(),
            })
            .await;
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("listening on {}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
