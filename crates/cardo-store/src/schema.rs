//! Database schema for the event store and the card catalog.

use cardo_core::error::DomainError;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

/// Embedded migrations from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies any pending migrations.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("migration failed: {e}")))?;
    info!("database schema is up to date");
    Ok(())
}
