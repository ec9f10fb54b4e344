//! This module defines the `ReserveRepository` trait, the read interface over the
//! legal reserve (`encaje_legal`) records and their categories.
use axioma_shared::ReserveEntry;
use chrono::NaiveDate;

use crate::errors::RepositoryError;

/// A trait that defines the read interface for legal reserve records.
#[async_trait::async_trait]
pub trait ReserveRepository: Send + Sync {
    /// Returns the distinct cut-off dates present in the store, newest first.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of dates to return.
    ///
    /// # Returns
    ///
    /// A `Result` with at most `limit` dates or a `RepositoryError` if the query fails.
    async fn recent_cutoff_dates(&self, limit: i64) -> Result<Vec<NaiveDate>, RepositoryError>;

    /// Returns every record whose cut-off date is in `dates`, joined with its category name.
    ///
    /// Rows are ordered by cut-off date descending, then by insertion order.
    ///
    /// # Arguments
    ///
    /// * `dates` - The cut-off dates to fetch (an empty slice yields no rows).
    ///
    /// # Returns
    ///
    /// A `Result` with the matching rows or a `RepositoryError` if the query fails.
    async fn entries_for_dates(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<ReserveEntry>, RepositoryError>;
}
