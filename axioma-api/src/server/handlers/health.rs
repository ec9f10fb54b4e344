use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.service.name,
        "revision": state.service.revision,
    }))
}
