// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use search_api::kernel::{build_search_engine, ServerDeps};
use search_api::{init_tracing, server::build_app, Config};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("Starting Bill Search API");

    // Load configuration
    let mut config = Config::from_env().context("Failed to load configuration")?;
    let api_key = config.api_key.take().context("API_KEY must be set")?;
    tracing::info!(
        strategy = %config.search.strategy,
        model = %config.llm_model,
        "Configuration loaded"
    );

    // Connect to database and model provider
    tracing::info!("Connecting to database...");
    let engine = build_search_engine(&config).await?;
    tracing::info!("Database connected");

    let deps = ServerDeps::new(
        Arc::new(engine),
        api_key,
        config.pipeline_timeout,
    );
    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
