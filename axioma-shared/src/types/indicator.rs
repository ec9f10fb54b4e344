//! Indicator search and detail types.
//!
//! Rows coming out of the repository (`IndicatorMatch`, `EntityLink`, `DetailRow`)
//! are flat; the engines fold them into the nested response payloads below.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::decimal;

/// An indicator matched by a search, with its text in the requested language.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorMatch {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: String,
    pub data_count: Option<i32>,
    pub source: Option<String>,
    /// `None` when the search was made without a user.
    pub is_favorite: Option<bool>,
}

/// A reporting entity that has at least one non-null value for an indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLink {
    pub indicator_id: i32,
    pub entity_id: i32,
    pub entity_code: String,
    pub entity_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntityRef {
    pub id: i32,
    pub code: String,
    pub name: String,
}

/// One indicator in a search response, with its related entities.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndicatorSummary {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: String,
    pub data_count: Option<i32>,
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    pub entities: Vec<EntityRef>,
}

/// A joined indicator/entity/period/value row for detail lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub indicator_code: String,
    pub indicator_name: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub entity_code: String,
    pub entity_name: String,
    pub entity_type: Option<String>,
    pub value: BigDecimal,
    pub period_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    #[serde(serialize_with = "decimal::as_f64")]
    pub value: BigDecimal,
    #[serde(rename = "period")]
    pub period_label: Option<String>,
}

/// The time series of one entity for one indicator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntitySeries {
    #[serde(rename = "entity_code")]
    pub code: String,
    #[serde(rename = "entity_name")]
    pub name: String,
    pub entity_type: Option<String>,
    pub values: Vec<SeriesPoint>,
}

/// Detail of one indicator for a single entity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndicatorDetails {
    pub indicator_code: String,
    #[serde(rename = "indicator_name")]
    pub name: String,
    #[serde(rename = "indicator_desc")]
    pub description: Option<String>,
    pub source: Option<String>,
    pub entity: EntitySeries,
}

/// Detail of one indicator for several entities.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndicatorEntitiesDetails {
    pub indicator_code: String,
    #[serde(rename = "indicator_name")]
    pub name: String,
    #[serde(rename = "indicator_desc")]
    pub description: Option<String>,
    pub source: Option<String>,
    pub entities: Vec<EntitySeries>,
}

/// An indicator a user has marked as favorite.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FavoriteIndicator {
    pub id: i32,
    pub code: String,
    /// `None` if the indicator has no text in the requested language.
    pub name: Option<String>,
    pub description: Option<String>,
    pub data_count: Option<i32>,
    pub source: Option<String>,
    pub updated_at: DateTime<Utc>,
}
