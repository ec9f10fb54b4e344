//! PostgreSQL implementation of the reserve repository.
use async_trait::async_trait;
use axioma_shared::ReserveEntry;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::{RepositoryError, ReserveRepository};

#[derive(sqlx::FromRow)]
struct ReserveRow {
    categoria: String,
    subcategoria: String,
    valor: BigDecimal,
    fecha_corte: NaiveDate,
    fuente: String,
}

impl From<ReserveRow> for ReserveEntry {
    fn from(row: ReserveRow) -> Self {
        ReserveEntry {
            category: row.categoria,
            subcategory: row.subcategoria,
            value: row.valor,
            cutoff_date: row.fecha_corte,
            source: row.fuente,
        }
    }
}

/// PostgreSQL-backed reserve repository over the `encaje_legal` and `category` tables.
pub struct PostgresReserveRepository {
    pool: sqlx::PgPool,
}

impl PostgresReserveRepository {
    /// Creates a new repository on a pool with the required schema.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReserveRepository for PostgresReserveRepository {
    async fn recent_cutoff_dates(&self, limit: i64) -> Result<Vec<NaiveDate>, RepositoryError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT fecha_corte
            FROM encaje_legal
            ORDER BY fecha_corte DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    async fn entries_for_dates(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<ReserveEntry>, RepositoryError> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ReserveRow>(
            r#"
            SELECT el.categoria, el.subcategoria, el.valor, el.fecha_corte, c.name AS fuente
            FROM encaje_legal el
            JOIN category c ON el.category_id = c.id
            WHERE el.fecha_corte = ANY($1)
            ORDER BY el.fecha_corte DESC, el.id
            "#,
        )
        .bind(dates)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReserveEntry::from).collect())
    }
}
