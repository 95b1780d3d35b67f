//! Satya Server
//!
//! HTTP front end for the verification pipeline: wires the Ollama provider,
//! the SQLite store, and the web fetcher into an axum service.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use axum::http::HeaderValue;
use config::ServerConfig;
use handlers::{create_router, AppState};
use satya_llm::{LlmError, OllamaProvider};
use satya_pipeline::{FetchError, PipelineError, VerificationPipeline, WebFetcher};
use satya_store::{SqliteStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// LLM client could not be built
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// HTTP fetch client could not be built
    #[error("Fetcher error: {0}")]
    Fetch(#[from] FetchError),

    /// Pipeline could not be constructed
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// A CORS origin is not a valid header value
    #[error("Invalid CORS origin: {0}")]
    Cors(String),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_err()
    {
        warn!("Tracing subscriber already installed");
    }
}

/// CORS policy for the configured origins; `*` allows any origin
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| ServerError::Cors(o.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Build the production pipeline state from configuration
pub fn build_state(
    config: &ServerConfig,
) -> Result<AppState<OllamaProvider, SqliteStore>, ServerError> {
    let llm = OllamaProvider::with_timeout(
        &config.llm.endpoint,
        &config.llm.model,
        Duration::from_secs(config.llm.request_timeout_secs),
    )?
    .with_vision_model(config.vision_model());

    let store = SqliteStore::new(&config.database_path)?;
    let fetcher = WebFetcher::with_timeout(Duration::from_secs(config.fetch_timeout_secs))?;
    let pipeline = VerificationPipeline::new(
        llm,
        store,
        Arc::new(fetcher),
        config.registry()?,
        config.pipeline.clone(),
    )?;

    Ok(AppState::new(pipeline))
}

/// Start the HTTP server
///
/// Validates configuration, opens the database, and serves until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting Satya server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path.display());
    info!(
        "LLM: {} (model {}, vision {})",
        config.llm.endpoint,
        config.llm.model,
        config.vision_model()
    );

    let state = build_state(&config)?;
    info!("Registered sources: {}", state.pipeline.registry().len());

    let app = create_router(state).layer(cors_layer(&config.cors_origins)?);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
