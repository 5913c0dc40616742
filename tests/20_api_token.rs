mod common;

use anyhow::Result;
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};

use common::{authed, get, json_request, with_cookie, TestApp};
use item_catalog::auth::TokenKind;

fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

#[tokio::test]
async fn register_then_issue_token_with_basic_auth() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .send(json_request(
            "POST",
            "/api/users",
            None,
            r#"{"name": "Grace", "email": "grace@example.com", "password": "hopper-1906"}"#,
        ))
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let body = res.json()?;
    assert_eq!(body["success"], "User registered");
    assert_eq!(body["user"]["email"], "grace@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let res = app
        .send(authed("GET", "/api/token", &basic("grace@example.com", "hopper-1906")))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let token = res.json()?["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    let res = app
        .send(authed("GET", "/api/categories", &format!("Bearer {}", token)))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.user("Grace", "grace@example.com").await?;

    let res = app
        .send(json_request(
            "POST",
            "/api/users",
            None,
            r#"{"name": "Other", "email": "grace@example.com", "password": "long-enough"}"#,
        ))
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.json()?["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.user("Grace", "grace@example.com").await?;

    let res = app
        .send(authed("GET", "/api/token", &basic("grace@example.com", "not-it")))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.json()?["error"].is_string());

    let res = app.send(get("/api/token")).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn session_can_be_exchanged_for_a_token() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user("Grace", "grace@example.com").await?;

    let res = app
        .send(with_cookie("GET", "/api/token", &app.session(user.id)?))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let token = res.json()?["token"].as_str().unwrap_or_default().to_string();
    assert_eq!(app.state.tokens.verify(&token, TokenKind::Api)?, user.id);
    Ok(())
}

#[tokio::test]
async fn token_accepted_before_expiry_and_rejected_after() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user("Grace", "grace@example.com").await?;

    let live = app
        .state
        .tokens
        .issue_until(user.id, TokenKind::Api, Utc::now() + Duration::minutes(5))?;
    let res = app
        .send(authed("GET", "/api/categories", &format!("Bearer {}", live.token)))
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    let expired = app
        .state
        .tokens
        .issue_until(user.id, TokenKind::Api, Utc::now() - Duration::seconds(5))?;
    let res = app
        .send(authed("GET", "/api/categories", &format!("Bearer {}", expired.token)))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.json()?["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn session_token_is_not_a_bearer_token() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.user("Grace", "grace@example.com").await?;

    let session = app.state.tokens.issue(user.id, TokenKind::Session)?;
    let res = app
        .send(authed("GET", "/api/categories", &format!("Bearer {}", session.token)))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.send(get("/api/categories")).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.location().is_none());
    Ok(())
}
