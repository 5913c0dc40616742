// handlers/public/token.rs - GET /api/token handler

use axum::{extract::State, http::HeaderMap};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{AuthError, TokenKind};
use crate::error::ApiError;
use crate::middleware::auth::extract_basic_credentials;
use crate::middleware::session::{read_cookie, session_user, SESSION_COOKIE};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenPayload {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

/// GET /api/token - issue a bearer token to a caller proven by HTTP Basic
/// (email + password) or by an interactive login session
pub async fn token_get(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<TokenPayload> {
    let user_id = match extract_basic_credentials(&headers).map_err(ApiError::unauthorized)? {
        Some((email, password)) => state.users.authenticate(&email, &password).await?.id,
        None => {
            let session = read_cookie(&headers, SESSION_COOKIE).ok_or(AuthError::MissingCredentials)?;
            session_user(&state, &session)
                .await
                .ok_or_else(|| ApiError::unauthorized("Session is invalid or expired"))?
                .id
        }
    };

    let issued = state.tokens.issue(user_id, TokenKind::Api)?;
    tracing::info!("Issued API token for user {}", user_id);

    Ok(ApiResponse::success(
        "Token issued",
        TokenPayload {
            expires_in: (issued.expires_at - Utc::now()).num_seconds().max(0),
            token: issued.token,
            expires_at: issued.expires_at,
        },
    ))
}
