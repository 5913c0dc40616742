// views/mod.rs - HTML rendering for the interactive surface
//
// Templates are compiled into the binary and rendered with Tera. Every page
// receives the signed-in user (or none) so the layout can offer login/logout.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use once_cell::sync::Lazy;
use tera::{Context, Tera};

use crate::auth::AuthError;
use crate::middleware::CurrentUser;
use crate::services::{CatalogError, UserError};

static TEMPLATES: Lazy<Result<Tera, tera::Error>> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("catalog.html", include_str!("../../templates/catalog.html")),
        ("category_form.html", include_str!("../../templates/category_form.html")),
        ("item_form.html", include_str!("../../templates/item_form.html")),
        ("confirm_delete.html", include_str!("../../templates/confirm_delete.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("error.html", include_str!("../../templates/error.html")),
    ])?;
    Ok(tera)
});

/// Failure on the HTML surface, rendered as an error page
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl PageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PageError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PageError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            PageError::Forbidden(_) => StatusCode::FORBIDDEN,
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            PageError::BadRequest(_) => "Invalid submission",
            PageError::Unauthorized(_) => "Login failed",
            PageError::Forbidden(_) => "Not allowed",
            PageError::NotFound(_) => "Not found",
            PageError::Upstream(_) => "Login provider unavailable",
            PageError::Internal(_) => "Something went wrong",
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut context = Context::new();
        context.insert("user", &Option::<()>::None);
        context.insert("viewer_id", &Option::<i64>::None);
        context.insert("status", &status.as_u16());
        context.insert("title", self.title());
        context.insert("message", &self.to_string());

        match render_template("error.html", &context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, self.to_string()).into_response()
            }
        }
    }
}

impl From<CatalogError> for PageError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(what) => PageError::NotFound(format!("{} was not found", what)),
            CatalogError::Forbidden(msg) => PageError::Forbidden(msg),
            CatalogError::Validation { message, .. } => PageError::BadRequest(message),
            other => {
                tracing::error!("Catalog operation failed: {}", other);
                PageError::Internal("The request could not be completed".to_string())
            }
        }
    }
}

impl From<AuthError> for PageError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Upstream(msg) => PageError::Upstream(msg),
            AuthError::TokenGeneration(_) | AuthError::PasswordHash(_) => {
                tracing::error!("Auth internals failed: {}", err);
                PageError::Internal("Login could not be completed".to_string())
            }
            other => PageError::Unauthorized(other.to_string()),
        }
    }
}

impl From<UserError> for PageError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Auth(e) => e.into(),
            other => {
                tracing::error!("User login failed: {}", other);
                PageError::Internal("Login could not be completed".to_string())
            }
        }
    }
}

/// Base context shared by every page
pub fn page_context(current: &CurrentUser) -> Context {
    let mut context = Context::new();
    context.insert("user", &current.0);
    context.insert("viewer_id", &current.id());
    context
}

pub fn render(template: &str, context: &Context) -> Result<Html<String>, PageError> {
    render_template(template, context).map(Html).map_err(|e| {
        tracing::error!("Failed to render {}: {}", template, e);
        PageError::Internal("The page could not be rendered".to_string())
    })
}

fn render_template(template: &str, context: &Context) -> Result<String, tera::Error> {
    match TEMPLATES.as_ref() {
        Ok(tera) => tera.render(template, context),
        Err(e) => Err(tera::Error::msg(format!("templates failed to load: {}", e))),
    }
}

/// 302 Found with the target in `Location`
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
