//! This module defines the `IndicatorRepository` trait, the read interface over
//! indicators, entities, time periods and their language-qualified texts.
use axioma_shared::{DetailRow, EntityLink, IndicatorMatch, Language};

use crate::errors::RepositoryError;

/// Parameters of an indicator search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorQuery {
    /// Free-text query. `None` selects the indicators with the most data points.
    pub text: Option<String>,
    pub limit: i64,
    pub lang: Language,
    /// When set, each match carries this user's favorite flag.
    pub user_id: Option<i32>,
}

/// Parameters of a detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailQuery {
    pub indicator_code: String,
    pub entity_codes: Vec<String>,
    pub lang: Language,
    /// Restricts entities to these `entity_type` values when set.
    pub entity_types: Option<Vec<String>>,
}

/// A trait that defines the read interface for the indicator dataset.
///
/// Every method only returns rows that have a text row in the requested language;
/// fact rows with a null value are never returned.
#[async_trait::async_trait]
pub trait IndicatorRepository: Send + Sync {
    /// Finds indicators matching `query`.
    ///
    /// With text, rows are ranked by full-text relevance over name and description;
    /// without, by `data_count` descending. Ties are broken by indicator id. Both
    /// paths only return indicators with a non-empty name and description.
    async fn search_indicators(
        &self,
        query: &IndicatorQuery,
    ) -> Result<Vec<IndicatorMatch>, RepositoryError>;

    /// Returns the distinct entities related to each of `indicator_ids` through
    /// non-null data values, ordered by entity name.
    async fn entity_links(
        &self,
        indicator_ids: &[i32],
        lang: Language,
    ) -> Result<Vec<EntityLink>, RepositoryError>;

    /// Returns the joined detail rows for an indicator and a set of entities,
    /// ordered by entity code then period label.
    async fn detail_rows(&self, query: &DetailQuery) -> Result<Vec<DetailRow>, RepositoryError>;
}
