// handlers/pages/category.rs - category forms (login required)

use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Response},
    Extension,
};

use super::redirect_if_missing;
use crate::services::CatalogError;
use crate::forms::FormSubmission;
use crate::middleware::{AuthUser, CurrentUser};
use crate::state::AppState;
use crate::views::{page_context, redirect, render, PageError};

/// GET /category/new
pub async fn new_get(Extension(current): Extension<CurrentUser>) -> Result<Html<String>, PageError> {
    let mut context = page_context(&current);
    context.insert("action", "/category/new");
    render("category_form.html", &context)
}

/// POST /category/new
pub async fn new_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let form = FormSubmission::read(multipart).await?;
    let category = state
        .catalog
        .create_category(user.id, form.category_input(), form.upload.as_ref())
        .await?;
    Ok(redirect(&format!("/category/{}", category.id)))
}

/// GET /category/:id/edit - owner only
pub async fn edit_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let category = state.catalog.owned_category(user.id, id).await?;

    let mut context = page_context(&current);
    context.insert("category", &category);
    context.insert("action", &format!("/category/{}/edit", id));
    render("category_form.html", &context)
}

/// POST /category/:id/edit
pub async fn edit_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let form = FormSubmission::read(multipart).await?;
    let category = state
        .catalog
        .update_category(user.id, id, form.category_input(), form.upload.as_ref())
        .await?;
    Ok(redirect(&format!("/category/{}", category.id)))
}

/// GET /category/:id/delete - confirmation page
pub async fn delete_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Response {
    redirect_if_missing(async {
        let category = state.catalog.owned_category(user.id, id).await?;

        let mut context = page_context(&current);
        context.insert("kind", "category");
        context.insert("name", &category.name);
        context.insert("action", &format!("/category/{}/delete", id));
        context.insert("cancel", &format!("/category/{}", id));
        Ok::<_, CatalogError>(confirm_page(&context))
    }
    .await)
}

/// POST /category/:id/delete - removes the category and every item in it
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Response {
    redirect_if_missing(
        state
            .catalog
            .delete_category(user.id, id)
            .await
            .map(|_| redirect("/")),
    )
}

pub(super) fn confirm_page(context: &tera::Context) -> Response {
    use axum::response::IntoResponse;

    match render("confirm_delete.html", context) {
        Ok(html) => html.into_response(),
        Err(e) => e.into_response(),
    }
}
