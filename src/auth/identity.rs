use async_trait::async_trait;

use super::AuthError;

/// Profile of a user whose identity the provider has verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub subject: String,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

/// Third-party login via the OAuth 2.0 authorization code flow
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Human-readable provider name for the login page
    fn name(&self) -> &str;

    /// Where to send the browser to start a login carrying `state`
    fn authorize_url(&self, state: &str) -> Result<String, AuthError>;

    /// Exchange an authorization code for verified identity claims
    async fn exchange(&self, code: &str) -> Result<IdentityClaims, AuthError>;
}
