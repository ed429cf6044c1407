use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
}

/// Reports process liveness and store connectivity
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is running; `database` reflects store connectivity", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        database: database.to_string(),
    })
}
