//! Dairy Core - Migration Runner Binary
//!
//! This binary applies the embedded database migrations to the
//! configured PostgreSQL database.
//!
//! # Usage
//!
//! ```bash
//! # Run against the default local database
//! cargo run --bin migrate
//!
//! # Run with an explicit connection string
//! DAIRY_DATABASE_URL=postgres://... cargo run --bin migrate
//! ```
//!
//! # Environment Variables
//!
//! * `DAIRY_DATABASE_URL` - PostgreSQL connection string
//! * `DAIRY_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `DAIRY_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use infra_db::{create_pool, run_migrations, StoreSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the migration runner.
///
/// Initializes logging, loads configuration, establishes the database
/// connection, and applies pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - A migration fails to apply
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let settings = load_settings();

    // Initialize tracing/logging
    init_tracing(&settings.log_level);

    tracing::info!("Starting Dairy Core migration runner");

    let pool = create_pool(settings.pool_config()).await?;
    run_migrations(&pool).await?;

    tracing::info!("Migration run complete");
    Ok(())
}

/// Loads settings from environment variables.
///
/// Falls back to individual env vars or defaults if the prefixed
/// configuration cannot be loaded.
fn load_settings() -> StoreSettings {
    StoreSettings::from_env().unwrap_or_else(|_| StoreSettings {
        database_url: std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DAIRY_DATABASE_URL"))
            .unwrap_or_else(|_| "postgres://localhost/dairy".to_string()),
        max_connections: std::env::var("DAIRY_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(10),
        log_level: std::env::var("DAIRY_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string()),
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
