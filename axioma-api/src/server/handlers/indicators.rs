use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use axioma_engine::SearchRequest;
use axioma_shared::{IndicatorDetails, IndicatorEntitiesDetails, IndicatorSummary};
use serde::Deserialize;

use super::parse_lang;
use crate::auth::AuthenticatedRequest;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Number of search results returned when `limit` is not given.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub entity_code: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntitiesParams {
    /// Comma separated entity codes.
    pub entity_codes: Option<String>,
    pub lang: Option<String>,
}

fn parse_limit(limit: Option<&str>) -> Result<usize, ApiError> {
    match limit.map(str::trim).filter(|l| !l.is_empty()) {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request("limit must be a positive integer")),
        None => Ok(DEFAULT_SEARCH_LIMIT),
    }
}

/// Full-text indicator search. Authenticated callers also get their favorite flags.
pub async fn search_indicators(
    State(state): State<AppState>,
    auth: Option<Extension<AuthenticatedRequest>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<IndicatorSummary>>, ApiError> {
    let request = SearchRequest {
        query: params.query,
        limit: parse_limit(params.limit.as_deref())?,
        lang: parse_lang(params.lang.as_deref())?,
        user_id: auth.map(|Extension(auth)| auth.user.id),
    };

    let results = state.engines.search.search(request).await?;
    Ok(Json(results))
}

pub async fn indicator_details(
    State(state): State<AppState>,
    Path(indicator_code): Path<String>,
    Query(params): Query<DetailParams>,
) -> Result<Json<IndicatorDetails>, ApiError> {
    let lang = parse_lang(params.lang.as_deref())?;
    let entity_code = params.entity_code.unwrap_or_default();

    let details = state
        .engines
        .detail
        .details(&indicator_code, &entity_code, lang)
        .await?;
    Ok(Json(details))
}

pub async fn indicator_entities_details(
    State(state): State<AppState>,
    Path(indicator_code): Path<String>,
    Query(params): Query<EntitiesParams>,
) -> Result<Json<IndicatorEntitiesDetails>, ApiError> {
    let lang = parse_lang(params.lang.as_deref())?;
    let entity_codes: Vec<String> = params
        .entity_codes
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::to_string)
        .collect();

    let details = state
        .engines
        .detail
        .details_by_entities(&indicator_code, &entity_codes, lang)
        .await?;
    Ok(Json(details))
}
