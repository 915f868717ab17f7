//! Embedded database migrations
//!
//! SQL files under the workspace `migrations/` directory are compiled
//! into the binary; [`run_migrations`] applies any that are still
//! pending. Applied versions are tracked in `_sqlx_migrations`, so the
//! runner is safe to call on every startup.

use sqlx::PgPool;
use tracing::info;

use crate::error::DatabaseError;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Applies all pending migrations
///
/// # Arguments
///
/// * `pool` - The PostgreSQL connection pool
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if a migration cannot be
/// applied
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    info!("Checking for pending migrations");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

    info!("All migrations applied");
    Ok(())
}
