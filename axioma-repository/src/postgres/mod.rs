//! PostgreSQL implementation of the AXIOMA repositories.
//!
//! Provides PostgreSQL backends for the `ReserveRepository`, `IndicatorRepository`
//! and `UserRepository` traits sharing one `sqlx::PgPool`.
//!
//! ## Database Tables
//!
//! - `category`, `encaje_legal`: legal reserve records and their owning categories
//! - `indicators`, `indicators_lang`: indicators and their per-language texts
//! - `entities`, `entities_lang`: reporting entities and their per-language texts
//! - `time_periods`, `data_values`: reporting intervals and the fact table
//! - `users`, `user_favorites`: synchronized users and their favorite indicators
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use crate::errors::RepositoryError;

mod indicator_repository;
mod reserve_repository;
mod user_repository;

pub use indicator_repository::PostgresIndicatorRepository;
pub use reserve_repository::PostgresReserveRepository;
pub use user_repository::PostgresUserRepository;

/// Connection settings for the shared pool.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    /// How long a caller waits for a free connection.
    pub acquire_timeout: Duration,
    /// Server-side limit applied to every statement on the pool's connections.
    pub statement_timeout: Duration,
}

/// Opens the connection pool used by all repositories.
///
/// # Arguments
///
/// * `settings` - Pool size, timeouts and connection URL
///
/// # Returns
///
/// * `Ok(PgPool)` - A pool whose connections carry the configured `statement_timeout`
/// * `Err(RepositoryError)` - Invalid URL or connection failure
pub async fn connect(settings: &PoolSettings) -> Result<sqlx::PgPool, RepositoryError> {
    let options = PgConnectOptions::from_str(&settings.url)?.options([(
        "statement_timeout",
        settings.statement_timeout.as_millis().to_string(),
    )]);

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("src/postgres/migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
