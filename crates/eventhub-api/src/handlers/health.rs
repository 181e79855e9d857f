//! Health check handlers.

use axum::Json;
use axum::extract::State;

use eventhub_core::traits::store::KeyValueStore;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = match state.store.health_check().await {
        Ok(true) => "ok",
        Ok(false) | Err(_) => "unavailable",
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
