//! Embedded schema migrations for the PostgreSQL store.

use sqlx::PgPool;
use tracing::info;

use cloudstore_core::error::{AppError, ErrorKind};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying sharing schema migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Sharing schema is up to date");
    Ok(())
}
