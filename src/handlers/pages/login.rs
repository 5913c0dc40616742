// handlers/pages/login.rs - OAuth login round trip and logout

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::TokenKind;
use crate::middleware::session::{
    read_cookie, removal_cookie, session_cookie, state_cookie, SESSION_COOKIE, STATE_COOKIE,
};
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::views::{page_context, redirect, render, PageError};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /login - issue an anti-forgery state and link to the provider
pub async fn login_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, PageError> {
    if current.0.is_some() {
        return Ok(redirect("/"));
    }

    let anti_forgery = Uuid::new_v4().simple().to_string();
    let authorize_url = state.identity.authorize_url(&anti_forgery)?;

    let mut context = page_context(&current);
    context.insert("authorize_url", &authorize_url);
    context.insert("provider", state.identity.name());
    let html = render("login.html", &context)?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, state_cookie(&state, &anti_forgery))]),
        html,
    )
        .into_response())
}

/// GET /oauth/callback?code&state - finish the provider login and start a session
pub async fn oauth_callback_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, PageError> {
    let expected = read_cookie(&headers, STATE_COOKIE);
    match (&expected, &query.state) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => {}
        _ => {
            tracing::warn!("OAuth callback with missing or mismatched state");
            return Err(PageError::Unauthorized("Invalid state parameter".to_string()));
        }
    }

    if let Some(error) = query.error {
        tracing::warn!("Identity provider returned an error: {}", error);
        return Err(PageError::Unauthorized(format!("Login was not completed: {}", error)));
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| PageError::BadRequest("Missing authorization code".to_string()))?;

    let claims = state.identity.exchange(&code).await?;
    let user = state.users.login_with_identity(&claims).await?;
    let session = state.tokens.issue(user.id, TokenKind::Session)?;
    tracing::info!("User {} logged in via {}", user.id, state.identity.name());

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session_cookie(&state, &session.token)),
            (header::SET_COOKIE, removal_cookie(&state, STATE_COOKIE)),
        ]),
        redirect("/"),
    )
        .into_response())
}

/// GET /logout - drop the session cookie
pub async fn logout_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Response {
    if let Some(id) = current.id() {
        tracing::info!("User {} logged out", id);
    }
    (
        AppendHeaders([(header::SET_COOKIE, removal_cookie(&state, SESSION_COOKIE))]),
        redirect("/"),
    )
        .into_response()
}
