//! PostgreSQL implementation of the indicator repository.
//!
//! Keyword search uses PostgreSQL full-text search with the text search
//! configuration of the requested language. Terms are OR-ed so that any matching
//! word qualifies a row, and `ts_rank` orders the matches.
use async_trait::async_trait;
use axioma_shared::{DetailRow, EntityLink, IndicatorMatch, Language};
use bigdecimal::BigDecimal;
use tracing::debug;

use crate::{DetailQuery, IndicatorQuery, IndicatorRepository, RepositoryError};

/// Filter shared by the keyword and top-indicator paths. `$1` is the language code.
macro_rules! indicator_text_filter {
    () => {
        r#"
            il.lang = $1
            AND il.indicator_name IS NOT NULL
            AND il.indicator_name <> ''
            AND il.description IS NOT NULL
            AND il.description <> ''
        "#
    };
}

/// Columns and joins shared by both search paths. `$2` is the optional user id.
macro_rules! indicator_select {
    () => {
        r#"
        SELECT
            i.indicator_id,
            i.indicator_code,
            il.indicator_name,
            il.description,
            i.data_count,
            i.source,
            CASE WHEN $2::int4 IS NULL THEN NULL ELSE COALESCE(uf.is_favorite, false) END AS is_favorite
        FROM indicators i
        JOIN indicators_lang il ON il.indicator_id = i.indicator_id
        LEFT JOIN user_favorites uf ON uf.indicator_id = i.indicator_id AND uf.user_id = $2
        "#
    };
}

const KEYWORD_SEARCH_SQL: &str = concat!(
    indicator_select!(),
    r#"
    CROSS JOIN (
        SELECT replace(plainto_tsquery($3::regconfig, $4)::text, ' & ', ' | ')::tsquery AS query
    ) AS search
    WHERE "#,
    indicator_text_filter!(),
    r#"
        AND to_tsvector($3::regconfig, il.indicator_name || ' ' || il.description) @@ search.query
    ORDER BY
        ts_rank(to_tsvector($3::regconfig, il.indicator_name || ' ' || il.description), search.query) DESC,
        i.indicator_id
    LIMIT $5
    "#
);

const TOP_INDICATORS_SQL: &str = concat!(
    indicator_select!(),
    " WHERE ",
    indicator_text_filter!(),
    r#"
    ORDER BY i.data_count DESC NULLS LAST, i.indicator_id
    LIMIT $3
    "#
);

const ENTITY_LINKS_SQL: &str = r#"
    SELECT DISTINCT dv.indicator_id, e.entity_id, e.entity_code, el.entity_name
    FROM data_values dv
    JOIN entities e ON dv.entity_id = e.entity_id
    JOIN entities_lang el ON el.entity_id = e.entity_id
    WHERE dv.indicator_id = ANY($1)
        AND el.lang = $2
        AND el.entity_name IS NOT NULL
        AND el.entity_name <> ''
        AND dv.value IS NOT NULL
    ORDER BY el.entity_name, e.entity_id
"#;

const DETAIL_ROWS_SQL: &str = r#"
    SELECT
        i.indicator_code,
        il.indicator_name,
        il.description,
        i.source,
        e.entity_code,
        el.entity_name,
        el.entity_type,
        dv.value,
        tp.period_label
    FROM indicators i
    JOIN indicators_lang il ON il.indicator_id = i.indicator_id
    JOIN data_values dv ON dv.indicator_id = i.indicator_id
    JOIN entities e ON dv.entity_id = e.entity_id
    JOIN entities_lang el ON el.entity_id = e.entity_id
    JOIN time_periods tp ON dv.period_id = tp.period_id
    WHERE i.indicator_code = $1
        AND e.entity_code = ANY($2)
        AND il.lang = $3
        AND el.lang = $3
        AND dv.value IS NOT NULL
        AND ($4::text[] IS NULL OR el.entity_type = ANY($4))
    ORDER BY e.entity_code, tp.period_label
"#;

#[derive(sqlx::FromRow)]
struct IndicatorMatchRow {
    indicator_id: i32,
    indicator_code: String,
    indicator_name: String,
    description: String,
    data_count: Option<i32>,
    source: Option<String>,
    is_favorite: Option<bool>,
}

impl From<IndicatorMatchRow> for IndicatorMatch {
    fn from(row: IndicatorMatchRow) -> Self {
        IndicatorMatch {
            id: row.indicator_id,
            code: row.indicator_code,
            name: row.indicator_name,
            description: row.description,
            data_count: row.data_count,
            source: row.source,
            is_favorite: row.is_favorite,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EntityLinkRow {
    indicator_id: i32,
    entity_id: i32,
    entity_code: String,
    entity_name: String,
}

#[derive(sqlx::FromRow)]
struct DetailRecord {
    indicator_code: String,
    indicator_name: String,
    description: Option<String>,
    source: Option<String>,
    entity_code: String,
    entity_name: String,
    entity_type: Option<String>,
    value: BigDecimal,
    period_label: Option<String>,
}

impl From<DetailRecord> for DetailRow {
    fn from(row: DetailRecord) -> Self {
        DetailRow {
            indicator_code: row.indicator_code,
            indicator_name: row.indicator_name,
            description: row.description,
            source: row.source,
            entity_code: row.entity_code,
            entity_name: row.entity_name,
            entity_type: row.entity_type,
            value: row.value,
            period_label: row.period_label,
        }
    }
}

/// PostgreSQL-backed repository for indicators, entities and data values.
pub struct PostgresIndicatorRepository {
    pool: sqlx::PgPool,
}

impl PostgresIndicatorRepository {
    /// Creates a new repository on a pool with the required schema.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IndicatorRepository for PostgresIndicatorRepository {
    async fn search_indicators(
        &self,
        query: &IndicatorQuery,
    ) -> Result<Vec<IndicatorMatch>, RepositoryError> {
        let rows = match query.text.as_deref() {
            Some(text) => {
                debug!(lang = %query.lang, "Running keyword indicator search");
                sqlx::query_as::<_, IndicatorMatchRow>(KEYWORD_SEARCH_SQL)
                    .bind(query.lang.code())
                    .bind(query.user_id)
                    .bind(query.lang.text_search_config())
                    .bind(text)
                    .bind(query.limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                debug!(lang = %query.lang, "Listing indicators by data count");
                sqlx::query_as::<_, IndicatorMatchRow>(TOP_INDICATORS_SQL)
                    .bind(query.lang.code())
                    .bind(query.user_id)
                    .bind(query.limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(IndicatorMatch::from).collect())
    }

    async fn entity_links(
        &self,
        indicator_ids: &[i32],
        lang: Language,
    ) -> Result<Vec<EntityLink>, RepositoryError> {
        if indicator_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, EntityLinkRow>(ENTITY_LINKS_SQL)
            .bind(indicator_ids)
            .bind(lang.code())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| EntityLink {
                indicator_id: row.indicator_id,
                entity_id: row.entity_id,
                entity_code: row.entity_code,
                entity_name: row.entity_name,
            })
            .collect())
    }

    async fn detail_rows(&self, query: &DetailQuery) -> Result<Vec<DetailRow>, RepositoryError> {
        if query.entity_codes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DetailRecord>(DETAIL_ROWS_SQL)
            .bind(&query.indicator_code)
            .bind(&query.entity_codes)
            .bind(query.lang.code())
            .bind(query.entity_types.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(DetailRow::from).collect())
    }
}
