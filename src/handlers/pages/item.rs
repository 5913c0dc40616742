// handlers/pages/item.rs - item forms (login required)

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, Response},
    Extension,
};
use serde::Deserialize;

use super::category::confirm_page;
use super::redirect_if_missing;
use crate::services::CatalogError;
use crate::forms::FormSubmission;
use crate::middleware::{AuthUser, CurrentUser};
use crate::state::AppState;
use crate::views::{page_context, redirect, render, PageError};

#[derive(Debug, Deserialize)]
pub struct NewItemQuery {
    pub category_id: Option<i64>,
}

/// GET /item/new?category_id= - the category is preselected when given
pub async fn new_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<NewItemQuery>,
) -> Result<Html<String>, PageError> {
    let categories = state.catalog.list_categories().await?;

    let mut context = page_context(&current);
    context.insert("categories", &categories);
    context.insert("selected_category", &query.category_id);
    context.insert("action", "/item/new");
    render("item_form.html", &context)
}

/// POST /item/new
pub async fn new_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let form = FormSubmission::read(multipart).await?;
    let item = state
        .catalog
        .create_item(user.id, form.item_input()?, form.upload.as_ref())
        .await?;
    Ok(redirect(&format!("/category/{}", item.category_id)))
}

/// GET /item/:id/edit - owner only
pub async fn edit_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let item = state.catalog.owned_item(user.id, id).await?;
    let categories = state.catalog.list_categories().await?;

    let mut context = page_context(&current);
    context.insert("item", &item);
    context.insert("categories", &categories);
    context.insert("selected_category", &item.category_id);
    context.insert("action", &format!("/item/{}/edit", id));
    render("item_form.html", &context)
}

/// POST /item/:id/edit
pub async fn edit_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let form = FormSubmission::read(multipart).await?;
    let item = state
        .catalog
        .update_item(user.id, id, form.item_input()?, form.upload.as_ref())
        .await?;
    Ok(redirect(&format!("/category/{}", item.category_id)))
}

/// GET /item/:id/delete - confirmation page
pub async fn delete_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Response {
    redirect_if_missing(async {
        let item = state.catalog.owned_item(user.id, id).await?;

        let mut context = page_context(&current);
        context.insert("kind", "item");
        context.insert("name", &item.name);
        context.insert("action", &format!("/item/{}/delete", id));
        context.insert("cancel", &format!("/category/{}", item.category_id));
        Ok::<_, CatalogError>(confirm_page(&context))
    }
    .await)
}

/// POST /item/:id/delete
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Response {
    redirect_if_missing(
        state
            .catalog
            .delete_item(user.id, id)
            .await
            .map(|item| redirect(&format!("/category/{}", item.category_id))),
    )
}
