use axum::{extract::State, Json};
use axioma_shared::ReserveReport;
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Legal reserve records of the most recent cut-off dates, grouped with totals.
pub async fn grouped_report(State(state): State<AppState>) -> Result<Json<ReserveReport>, ApiError> {
    let report = state.engines.reserve.grouped_report().await?;

    if report.is_empty() {
        info!("Legal reserve report requested with no data");
        return Err(ApiError::NotFound(
            "No legal reserve data available".to_string(),
        ));
    }

    Ok(Json(report))
}
