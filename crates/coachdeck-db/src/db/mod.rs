pub mod exercise;

pub use exercise::ExerciseRepository;

use coachdeck_core::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

const ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Open a connection pool to the catalog database
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect(database_url)
        .await?;

    tracing::info!(max_connections, "Connected to catalog database");
    Ok(pool)
}

/// Apply the embedded migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Catalog(format!("Migration failed: {}", e)))?;

    tracing::info!("Catalog migrations applied");
    Ok(())
}
