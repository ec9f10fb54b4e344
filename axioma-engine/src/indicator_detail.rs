//! Per-entity time series of an indicator.
use std::collections::HashMap;
use std::sync::Arc;

use axioma_repository::{DetailQuery, IndicatorRepository};
use axioma_shared::{
    DetailRow, EntitySeries, IndicatorDetails, IndicatorEntitiesDetails, Language, SeriesPoint,
};
use tracing::{debug, instrument};

use crate::config::DetailConfig;
use crate::errors::EngineError;

/// Indicator-level fields shared by every row of a lookup.
struct Header {
    indicator_code: String,
    name: String,
    description: Option<String>,
    source: Option<String>,
}

/// Single and multi-entity detail lookups.
///
/// Both contracts order each entity's series by period label ascending. Entities
/// appear in the order the store returns them.
pub struct IndicatorDetailEngine {
    repository: Arc<dyn IndicatorRepository>,
    config: DetailConfig,
}

impl IndicatorDetailEngine {
    pub fn new(repository: Arc<dyn IndicatorRepository>, config: DetailConfig) -> Self {
        Self { repository, config }
    }

    /// Returns the series of `indicator_code` for one entity.
    ///
    /// # Returns
    ///
    /// * `Ok(IndicatorDetails)` - The indicator header and the entity series
    /// * `Err(EngineError::NotFound)` - If no row matches
    /// * `Err(EngineError::InvalidArgument)` - If either code is blank
    #[instrument(skip(self), fields(lang = %lang))]
    pub async fn details(
        &self,
        indicator_code: &str,
        entity_code: &str,
        lang: Language,
    ) -> Result<IndicatorDetails, EngineError> {
        let entity_code = entity_code.trim();
        if entity_code.is_empty() {
            return Err(EngineError::invalid_argument("entity_code is required"));
        }

        let rows = self
            .fetch(indicator_code, vec![entity_code.to_string()], lang)
            .await?;
        let (header, mut entities) = group_rows(rows).ok_or_else(|| {
            EngineError::not_found(format!(
                "No data for indicator {} and entity {}",
                indicator_code, entity_code
            ))
        })?;

        // The store filters on a single code, so there is exactly one series.
        let entity = entities.swap_remove(0);
        Ok(IndicatorDetails {
            indicator_code: header.indicator_code,
            name: header.name,
            description: header.description,
            source: header.source,
            entity,
        })
    }

    /// Returns the series of `indicator_code` for each of `entity_codes`.
    ///
    /// Codes are trimmed and deduplicated; codes without data are left out.
    ///
    /// # Returns
    ///
    /// * `Ok(IndicatorEntitiesDetails)` - The indicator header and one series per entity with data
    /// * `Err(EngineError::NotFound)` - If no row matches any entity
    /// * `Err(EngineError::InvalidArgument)` - If no usable entity code is given
    #[instrument(skip(self), fields(lang = %lang))]
    pub async fn details_by_entities(
        &self,
        indicator_code: &str,
        entity_codes: &[String],
        lang: Language,
    ) -> Result<IndicatorEntitiesDetails, EngineError> {
        let mut codes: Vec<String> = Vec::with_capacity(entity_codes.len());
        for code in entity_codes.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
            if !codes.iter().any(|c| c == code) {
                codes.push(code.to_string());
            }
        }
        if codes.is_empty() {
            return Err(EngineError::invalid_argument(
                "At least one entity code is required",
            ));
        }

        let rows = self.fetch(indicator_code, codes, lang).await?;
        let (header, entities) = group_rows(rows).ok_or_else(|| {
            EngineError::not_found(format!(
                "No data for indicator {} and the requested entities",
                indicator_code
            ))
        })?;

        Ok(IndicatorEntitiesDetails {
            indicator_code: header.indicator_code,
            name: header.name,
            description: header.description,
            source: header.source,
            entities,
        })
    }

    async fn fetch(
        &self,
        indicator_code: &str,
        entity_codes: Vec<String>,
        lang: Language,
    ) -> Result<Vec<DetailRow>, EngineError> {
        let indicator_code = indicator_code.trim();
        if indicator_code.is_empty() {
            return Err(EngineError::invalid_argument("indicator_code is required"));
        }

        let query = DetailQuery {
            indicator_code: indicator_code.to_string(),
            entity_codes,
            lang,
            entity_types: self.config.entity_types.clone(),
        };
        let rows = self.repository.detail_rows(&query).await?;
        debug!(rows = rows.len(), "Fetched detail rows");
        Ok(rows)
    }
}

/// Groups rows by entity code in first-seen order and sorts every series by
/// period label. Returns `None` for an empty result set.
fn group_rows(rows: Vec<DetailRow>) -> Option<(Header, Vec<EntitySeries>)> {
    let first = rows.first()?;
    let header = Header {
        indicator_code: first.indicator_code.clone(),
        name: first.indicator_name.clone(),
        description: first.description.clone(),
        source: first.source.clone(),
    };

    let mut entities: Vec<EntitySeries> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let pos = match index.get(&row.entity_code) {
            Some(pos) => *pos,
            None => {
                entities.push(EntitySeries {
                    code: row.entity_code.clone(),
                    name: row.entity_name,
                    entity_type: row.entity_type,
                    values: Vec::new(),
                });
                index.insert(row.entity_code, entities.len() - 1);
                entities.len() - 1
            }
        };
        entities[pos].values.push(SeriesPoint {
            value: row.value,
            period_label: row.period_label,
        });
    }

    for entity in &mut entities {
        entity
            .values
            .sort_by(|a, b| a.period_label.cmp(&b.period_label));
    }

    Some((header, entities))
}
