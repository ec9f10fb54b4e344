//! Dependency initialization and wiring for the API.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use axioma_engine::{Engines, Repositories};
use axioma_repository::{
    connect, run_migrations, PgPool, PoolSettings, PostgresIndicatorRepository, PostgresReserveRepository,
    PostgresUserRepository, RepositoryError,
};

use crate::auth::FirebaseTokenVerifier;
use crate::config::{AppConfig, DatabaseSettings};
use crate::server::state::{AppState, ServiceInfo};
use crate::ServiceError;

/// Connection mode for PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at the configured interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from the `DB_CONNECTION_MODE` value.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid DB_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared state handed to the router.
    pub state: AppState,
}

impl Dependencies {
    /// Initialize all dependencies from the service settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If initialization fails (database only in fail-fast mode)
    pub async fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        info!(
            connection_mode = ?config.database.connection_mode,
            retry_interval_secs = config.database.retry_interval.as_secs(),
            max_connections = config.database.max_connections,
            run_migrations = config.database.run_migrations,
            "Initializing dependencies"
        );

        let pool = Self::connect_to_postgres(&config.database).await?;

        info!("PostgreSQL connection established");

        if config.database.run_migrations {
            run_migrations(&pool).await?;
        }

        let repositories = Repositories {
            reserve: Arc::new(PostgresReserveRepository::new(pool.clone())),
            indicators: Arc::new(PostgresIndicatorRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool)),
        };
        let engines = Engines::new(repositories, config.engine.clone());

        let verifier = FirebaseTokenVerifier::new(
            config.firebase.project_id.clone(),
            config.firebase.keys_ttl,
        )
        .map_err(|e| ServiceError::config(format!("Failed to create token verifier: {}", e)))?;

        let state = AppState {
            engines,
            verifier: Arc::new(verifier),
            service: Arc::new(ServiceInfo {
                name: config.service_name.clone(),
                revision: config.revision.clone(),
            }),
        };

        Ok(Self { state })
    }

    /// Connect to PostgreSQL with retry logic based on connection mode.
    async fn connect_to_postgres(
        settings: &DatabaseSettings,
    ) -> Result<PgPool, ServiceError> {
        let pool_settings = PoolSettings {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            acquire_timeout: settings.acquire_timeout,
            statement_timeout: settings.statement_timeout,
        };

        loop {
            match connect(&pool_settings).await {
                Ok(pool) => return Ok(pool),
                Err(e) if e.is_configuration() => return Err(e.into()),
                Err(e) => match settings.connection_mode {
                    ConnectionMode::FailFast => return Err(e.into()),
                    ConnectionMode::Retry => {
                        Self::log_retry(&e, settings.retry_interval);
                        sleep(settings.retry_interval).await;
                    }
                },
            }
        }
    }

    fn log_retry(error: &RepositoryError, retry_interval: Duration) {
        warn!(
            error = %error,
            retry_interval_secs = retry_interval.as_secs(),
            "Failed to connect to PostgreSQL, retrying..."
        );
    }
}
