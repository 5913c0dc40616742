//! Google sign-in: authorization code exchange, token audience check and
//! profile lookup against Google's OAuth 2.0 endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{AuthError, IdentityClaims, IdentityProvider};
use crate::config::OAuthConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    azp: Option<String>,
    sub: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

#[derive(Clone)]
pub struct GoogleProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleProvider {
    pub fn new(config: &OAuthConfig) -> Self {
        Self {
            client: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
        }
    }

    async fn access_token(&self, code: &str) -> Result<String, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_url.as_str()),
        ];

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Upstream(format!(
                "failed to upgrade the authorization code: status={}, body={}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("failed to parse token response: {}", e)))?;
        Ok(token.access_token)
    }

    /// The access token must have been issued to this app
    async fn check_token(&self, access_token: &str) -> Result<TokenInfo, AuthError> {
        let info: TokenInfo = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("tokeninfo request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("failed to parse tokeninfo: {}", e)))?;

        if let Some(error) = &info.error_description {
            return Err(AuthError::Upstream(format!("access token rejected: {}", error)));
        }

        let audience = info.aud.as_deref().or(info.azp.as_deref());
        if audience != Some(self.client_id.as_str()) {
            return Err(AuthError::Upstream(
                "token's client ID does not match app's".to_string(),
            ));
        }
        Ok(info)
    }

    async fn profile(&self, access_token: &str) -> Result<UserInfo, AuthError> {
        let response = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("profile request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::Upstream(format!(
                "profile request failed: status={}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("failed to parse profile: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &str {
        "Google"
    }

    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("scope", SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Upstream(e.to_string()))?;
        Ok(url.into())
    }

    async fn exchange(&self, code: &str) -> Result<IdentityClaims, AuthError> {
        if self.client_id.is_empty() {
            return Err(AuthError::Upstream("OAuth client is not configured".to_string()));
        }

        let access_token = self.access_token(code).await?;
        let token_info = self.check_token(&access_token).await?;
        let profile = self.profile(&access_token).await?;

        if token_info.sub.as_deref() != Some(profile.sub.as_str()) {
            return Err(AuthError::Upstream(
                "token's user ID doesn't match given user ID".to_string(),
            ));
        }

        let email = profile
            .email
            .ok_or_else(|| AuthError::Upstream("profile has no email".to_string()))?;

        Ok(IdentityClaims {
            name: profile.name.unwrap_or_else(|| email.clone()),
            subject: profile.sub,
            email,
            picture: profile.picture,
        })
    }
}
