#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use item_catalog::auth::{AuthError, IdentityClaims, IdentityProvider, TokenKind};
use item_catalog::config::AppConfig;
use item_catalog::database::{Store, User};
use item_catalog::storage::DirectoryBlobStore;
use item_catalog::{app, AppState};

pub const GOOD_CODE: &str = "good-code";
pub const PASSWORD: &str = "correct-horse-battery";

/// Identity provider that accepts exactly one authorization code
pub struct StubIdentity {
    pub claims: IdentityClaims,
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    fn name(&self) -> &str {
        "Stub"
    }

    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        Ok(format!("https://id.example.com/authorize?state={}", state))
    }

    async fn exchange(&self, code: &str) -> Result<IdentityClaims, AuthError> {
        if code == GOOD_CODE {
            Ok(self.claims.clone())
        } else {
            Err(AuthError::Upstream("authorization code rejected".to_string()))
        }
    }
}

/// Router over an in-memory database and a temporary upload directory
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let uploads = tempfile::tempdir().context("failed to create upload dir")?;

        let mut config = AppConfig::development();
        config.security.secret_key = "integration-test-secret".to_string();
        config.uploads.directory = uploads.path().to_path_buf();

        let store = Store::in_memory().await?;
        let blobs = DirectoryBlobStore::open(uploads.path()).await?;
        let identity = StubIdentity {
            claims: IdentityClaims {
                subject: "stub-42".to_string(),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                picture: None,
            },
        };

        let state = AppState::new(config, store, Arc::new(blobs), Arc::new(identity));
        let router = app(state.clone());
        Ok(Self { state, router, uploads })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await?.to_bytes();
        Ok(TestResponse { status, headers, body })
    }

    /// A password account, usable with HTTP Basic
    pub async fn user(&self, name: &str, email: &str) -> Result<User> {
        Ok(self.state.users.register(name, email, PASSWORD).await?)
    }

    pub fn bearer(&self, user_id: i64) -> Result<String> {
        let issued = self.state.tokens.issue(user_id, TokenKind::Api)?;
        Ok(format!("Bearer {}", issued.token))
    }

    /// `Cookie` header value for a logged-in browser
    pub fn session(&self, user_id: i64) -> Result<String> {
        let issued = self.state.tokens.issue(user_id, TokenKind::Session)?;
        Ok(format!("catalog_session={}", issued.token))
    }

    pub fn stored_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.uploads.path())? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body)
            .with_context(|| format!("body is not JSON: {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION)?.to_str().ok()
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Value of a cookie set by this response, `None` if not set
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.set_cookies().into_iter().find_map(|c| {
            let pair = c.split(';').next()?.to_string();
            pair.strip_prefix(&prefix).map(str::to_string)
        })
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn authed(method: &str, uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .body(Body::empty())
        .expect("request")
}

pub fn with_cookie(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

/// A multipart form POST, optionally carrying a file in `file_field`
pub fn form_post(
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    const BOUNDARY: &str = "catalog-test-boundary";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((field, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).expect("request")
}
