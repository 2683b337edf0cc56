//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match &state.db_pool {
        Some(pool) => match pool.health_check().await {
            Ok(true) => "postgres",
            _ => "postgres (unreachable)",
        },
        None => "memory",
    };

    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
