//! Alexzo Gateway - Main Application Entry Point
//!
//! This is the REST API server fronting the Alexzo image-generation
//! service. It issues `alexzo_` API keys on behalf of the web app and
//! validates them on every generation call.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries)
//! - **Authentication**: bearer API keys, optional SHA-256 digest storage
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use alexzo_gateway::{AppState, Config, KeyStore, UpstreamConfig, db, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration and validate the upstream provider settings
    let config = Config::from_env()?;
    let upstream = UpstreamConfig::from_config(&config)?;
    tracing::info!("Configuration loaded, upstream base {}", upstream.base_url);

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    if config.hash_keys {
        tracing::info!("Key store running in hashed mode");
    }

    // The store is built here and injected; handlers never reach for a
    // global database handle.
    let state = AppState {
        store: KeyStore::new(pool, config.hash_keys),
        upstream,
    };
    let app = router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
