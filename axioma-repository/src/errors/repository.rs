use thiserror::Error;

/// Represents errors that can occur within the repositories.
///
/// This enum consolidates error conditions specific to database interactions,
/// such as SQLx errors during queries or migrations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(i32),
}

impl RepositoryError {
    /// True when the failure comes from the connection settings themselves and
    /// retrying with the same settings cannot succeed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::DatabaseError(sqlx::Error::Configuration(_)))
    }
}
