// handlers/public/health.rs - GET /health handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /health - liveness including a database ping
pub async fn health_get(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => ApiResponse::success(
            "ok",
            json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            }),
        )
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "database unavailable",
                    "status": "degraded",
                    "timestamp": now,
                })),
            )
                .into_response()
        }
    }
}
