mod config;
mod db;
mod errors;
mod llm_client;
mod nlp;
mod parsing;
mod routes;
mod screening;
mod sessions;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageConfig};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::nlp::{HttpEmbedder, LexiconExtractor};
use crate::routes::build_router;
use crate::screening::pipeline::ScoringModels;
use crate::screening::prompts::EXPLANATION_SYSTEM;
use crate::sessions::PgSessionRepository;
use crate::state::AppState;
use crate::storage::{FileStore, LocalFileStore, S3FileStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;
    let sessions = Arc::new(PgSessionRepository::new(db));

    let files: Arc<dyn FileStore> = match &config.storage {
        StorageConfig::Local { root } => {
            info!("Storing resumes under {}", root.display());
            Arc::new(LocalFileStore::new(root.clone()))
        }
        StorageConfig::S3 {
            bucket,
            endpoint,
            access_key_id,
            secret_access_key,
        } => {
            let client = build_s3_client(endpoint, access_key_id, secret_access_key).await;
            info!("Storing resumes in S3 bucket {bucket}");
            Arc::new(S3FileStore::new(client, bucket.clone()))
        }
    };

    // Models are loaded once; any failure here is fatal.
    let extractor = LexiconExtractor::load(config.skill_lexicon_path.as_deref())?;

    let embedder = HttpEmbedder::connect(
        config.embedding_api_url.clone(),
        config.embedding_model.clone(),
        config.embedding_api_key.clone(),
        config.llm_timeout,
    )
    .await
    .context("Embedding model is unavailable")?;

    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        EXPLANATION_SYSTEM,
        config.llm_timeout,
    )
    .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        models: ScoringModels {
            embedder: Arc::new(embedder),
            extractor: Arc::new(extractor),
            generator: Arc::new(llm),
        },
        sessions,
        files,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(
    endpoint: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "screener-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
