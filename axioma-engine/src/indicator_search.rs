//! Indicator search.
//!
//! A search runs two queries: the ranked indicator matches, then one fan-out query
//! for the entities related to all matches. Entities are attached in the order the
//! store returns them (by entity name).
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axioma_repository::{IndicatorQuery, IndicatorRepository};
use axioma_shared::{EntityRef, IndicatorSummary, Language};
use tracing::{debug, info, instrument};

use crate::config::SearchConfig;
use crate::errors::EngineError;

/// A search request as received from the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query. Blank queries select the indicators with the most data.
    pub query: Option<String>,
    pub limit: usize,
    pub lang: Language,
    /// Authenticated user, if any; enables the favorite flag on every result.
    pub user_id: Option<i32>,
}

/// Full-text and top-N indicator search.
pub struct IndicatorSearchEngine {
    repository: Arc<dyn IndicatorRepository>,
    config: SearchConfig,
}

impl IndicatorSearchEngine {
    pub fn new(repository: Arc<dyn IndicatorRepository>, config: SearchConfig) -> Self {
        Self { repository, config }
    }

    fn validate_limit(&self, limit: usize) -> Result<(), EngineError> {
        if limit == 0 {
            return Err(EngineError::invalid_argument("limit must be at least 1"));
        }
        if let Some(max) = self.config.max_limit {
            if limit > max {
                return Err(EngineError::LimitExceeded {
                    provided: limit,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Searches indicators and attaches the related entities of every match.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<IndicatorSummary>)` - At most `limit` summaries, possibly empty
    /// * `Err(EngineError::InvalidArgument)` - If `limit` is zero
    /// * `Err(EngineError::LimitExceeded)` - If `limit` is above the configured maximum
    /// * `Err(EngineError::Repository)` - If a query fails
    #[instrument(skip(self, request), fields(lang = %request.lang, limit = request.limit))]
    pub async fn search(
        &self,
        request: SearchRequest,
    ) -> Result<Vec<IndicatorSummary>, EngineError> {
        self.validate_limit(request.limit)?;

        let text = request
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let query = IndicatorQuery {
            text,
            limit: request.limit as i64,
            lang: request.lang,
            user_id: request.user_id,
        };

        let mut matches = self.repository.search_indicators(&query).await?;
        matches.truncate(request.limit);

        if matches.is_empty() {
            debug!(keyword = query.text.is_some(), "No indicators matched");
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = matches.iter().map(|m| m.id).collect();
        let links = self.repository.entity_links(&ids, request.lang).await?;

        let mut seen = HashSet::with_capacity(links.len());
        let mut entities: HashMap<i32, Vec<EntityRef>> = HashMap::with_capacity(ids.len());
        for link in links {
            if !seen.insert((link.indicator_id, link.entity_id)) {
                continue;
            }
            entities
                .entry(link.indicator_id)
                .or_default()
                .push(EntityRef {
                    id: link.entity_id,
                    code: link.entity_code,
                    name: link.entity_name,
                });
        }

        let summaries: Vec<IndicatorSummary> = matches
            .into_iter()
            .map(|m| IndicatorSummary {
                entities: entities.remove(&m.id).unwrap_or_default(),
                id: m.id,
                code: m.code,
                name: m.name,
                description: m.description,
                data_count: m.data_count,
                source: m.source,
                is_favorite: request.user_id.map(|_| m.is_favorite.unwrap_or(false)),
            })
            .collect();

        info!(
            results = summaries.len(),
            keyword = query.text.is_some(),
            "Indicator search completed"
        );
        Ok(summaries)
    }
}
