//! Remit API Server
//!
//! Main entry point for the Remit ledger service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remit_api::{AppState, create_router};
use remit_core::ledger::BalanceCache;
use remit_db::connect;
use remit_shared::{AppConfig, JwtService, jwt::JwtConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service from explicit config (no ambient env reads)
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expiry_secs: config.jwt.access_token_expiry_secs,
    });

    // One balance cache per process, shared by every repository
    let cache = BalanceCache::with_config(config.cache.max_capacity, config.cache.ttl_secs);
    info!(
        ttl_secs = config.cache.ttl_secs,
        max_capacity = config.cache.max_capacity,
        "Balance cache configured"
    );

    // Create application state and router
    let state = AppState::new(db, jwt_service, cache);
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
