pub mod google;
pub mod identity;
pub mod password;

pub use identity::{IdentityClaims, IdentityProvider};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token was not issued for this kind of request")]
    WrongTokenKind,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Identity provider error: {0}")]
    Upstream(String),
}

/// Which request class a token authenticates. API bearer tokens and session
/// cookies are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Api,
    Session,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 tokens for both API bearer auth and sessions
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    api_ttl: Duration,
    session_ttl: Duration,
}

impl TokenSigner {
    pub fn new(security: &SecurityConfig) -> Self {
        let secret = security.secret_key.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            api_ttl: Duration::seconds(security.api_token_ttl_secs as i64),
            session_ttl: Duration::hours(security.session_ttl_hours as i64),
        }
    }

    pub fn api_ttl(&self) -> Duration {
        self.api_ttl
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn issue(&self, user_id: i64, kind: TokenKind) -> Result<IssuedToken, AuthError> {
        let ttl = match kind {
            TokenKind::Api => self.api_ttl,
            TokenKind::Session => self.session_ttl,
        };
        self.issue_until(user_id, kind, Utc::now() + ttl)
    }

    pub fn issue_until(
        &self,
        user_id: i64,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            kind,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, expiry and kind; returns the user id
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<i64, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.kind != kind {
            return Err(AuthError::WrongTokenKind);
        }
        data.claims.user_id()
    }
}
