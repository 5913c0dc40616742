use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::auth::TokenKind;
use crate::database::{DatabaseError, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, resolved from a bearer token or a session cookie
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            picture: user.picture,
        }
    }
}

/// Bearer authentication for the JSON API. Failures are a 401 envelope, never a redirect.
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(ApiError::unauthorized)?;
    let user_id = state.tokens.verify(&token, TokenKind::Api)?;

    let user = state.users.get(user_id).await.map_err(|e| match e {
        DatabaseError::NotFound(_) => {
            tracing::warn!("Bearer token for unknown user {}", user_id);
            ApiError::unauthorized("User no longer exists")
        }
        other => other.into(),
    })?;

    request.extensions_mut().insert(AuthUser::from(user));
    Ok(next.run(request).await)
}

/// Extract token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_str = authorization(headers)?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Extract `(username, password)` from `Authorization: Basic <base64>`
pub fn extract_basic_credentials(headers: &HeaderMap) -> Result<Option<(String, String)>, String> {
    let Ok(auth_str) = authorization(headers) else {
        return Ok(None);
    };
    let Some(encoded) = auth_str.strip_prefix("Basic ") else {
        return Ok(None);
    };

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| "Invalid Basic credentials encoding".to_string())?;
    let decoded = String::from_utf8(decoded).map_err(|_| "Invalid Basic credentials encoding".to_string())?;

    let (user, password) = decoded
        .split_once(':')
        .ok_or_else(|| "Basic credentials must be user:password".to_string())?;
    Ok(Some((user.to_string(), password.to_string())))
}

fn authorization(headers: &HeaderMap) -> Result<&str, String> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert!(extract_bearer_token(&headers("Bearer   ")).is_err());
        assert!(extract_bearer_token(&headers("Token abc")).is_err());
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn basic_credentials_extraction() {
        let encoded = STANDARD.encode("ada@example.com:pa:ss");
        let creds = extract_basic_credentials(&headers(&format!("Basic {encoded}"))).unwrap();
        assert_eq!(
            creds,
            Some(("ada@example.com".to_string(), "pa:ss".to_string()))
        );

        assert_eq!(extract_basic_credentials(&HeaderMap::new()).unwrap(), None);
        assert_eq!(extract_basic_credentials(&headers("Bearer x")).unwrap(), None);
        assert!(extract_basic_credentials(&headers("Basic !!!")).is_err());
    }
}
