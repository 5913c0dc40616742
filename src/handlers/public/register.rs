// handlers/public/register.rs - POST /api/users handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/users - create a password account usable with HTTP Basic token issuance
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let user = state
        .users
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok(ApiResponse::created("User registered", json!({ "user": user })))
}
