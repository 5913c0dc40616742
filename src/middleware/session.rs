use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};

use super::auth::AuthUser;
use crate::auth::TokenKind;
use crate::state::AppState;
use crate::views::redirect;

pub const SESSION_COOKIE: &str = "catalog_session";
pub const STATE_COOKIE: &str = "catalog_oauth_state";

/// The user behind the session cookie, if any. Inserted for every HTML request.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<AuthUser>);

impl CurrentUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

/// Resolve the session cookie to a user. An invalid or expired session is
/// treated as anonymous rather than an error.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match read_cookie(request.headers(), SESSION_COOKIE) {
        Some(token) => session_user(&state, &token).await,
        None => None,
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

pub(crate) async fn session_user(state: &AppState, token: &str) -> Option<AuthUser> {
    let user_id = match state.tokens.verify(token, TokenKind::Session) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {}", e);
            return None;
        }
    };

    match state.users.get(user_id).await {
        Ok(user) => Some(AuthUser::from(user)),
        Err(e) => {
            tracing::warn!("Session for user {} could not be loaded: {}", user_id, e);
            None
        }
    }
}

/// Gate for HTML mutation routes: anonymous callers are sent to the login page
pub async fn require_login(mut request: Request, next: Next) -> Response {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .and_then(|current| current.0.clone());

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            tracing::debug!("Login required for {}", request.uri());
            redirect("/login")
        }
    }
}

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(state: &AppState, token: &str) -> String {
    let max_age = CookieDuration::seconds(state.tokens.session_ttl().num_seconds());
    build_cookie(SESSION_COOKIE, token, max_age, state.config.security.secure_cookies)
}

/// Short-lived anti-forgery cookie for the OAuth round trip
pub fn state_cookie(state: &AppState, value: &str) -> String {
    build_cookie(
        STATE_COOKIE,
        value,
        CookieDuration::minutes(10),
        state.config.security.secure_cookies,
    )
}

pub fn removal_cookie(state: &AppState, name: &str) -> String {
    build_cookie(name, "", CookieDuration::ZERO, state.config.security.secure_cookies)
}

fn build_cookie(name: &str, value: &str, max_age: CookieDuration, secure: bool) -> String {
    Cookie::build((name.to_string(), value.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
        .to_string()
}
