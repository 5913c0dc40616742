// handlers/pages/mod.rs - HTML handlers (session cookie)
//
// resolve_session runs for every page and inserts CurrentUser. Mutation
// routes add require_login, which redirects anonymous browsers to /login and
// inserts AuthUser for the handler.

pub mod catalog;  // GET /, GET /category/:id
pub mod category; // /category/new, /category/:id/edit, /category/:id/delete
pub mod item;     // /item/new, /item/:id/edit, /item/:id/delete
pub mod login;    // /login, /oauth/callback, /logout
pub mod media;    // GET /media/:name

use axum::response::{IntoResponse, Response};

use crate::services::CatalogError;
use crate::views::{redirect, PageError};

pub use catalog::{catalog_get, category_view_get};
pub use login::{login_get, logout_get, oauth_callback_get};
pub use media::media_get;

/// Deleting something that is already gone is not an error for a browser
fn redirect_if_missing(result: Result<Response, CatalogError>) -> Response {
    match result {
        Ok(response) => response,
        Err(CatalogError::NotFound(what)) => {
            tracing::debug!("Delete of missing {}, redirecting", what);
            redirect("/")
        }
        Err(e) => PageError::from(e).into_response(),
    }
}
