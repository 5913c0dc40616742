// handlers/protected/item.rs - item endpoints of the JSON API
//
// Items are addressed through their category; an item that exists but sits
// in another category is reported as not found.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::body;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /api/category/:id/items - create an item in the category
pub async fn items_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(category_id): Path<i64>,
    body: Bytes,
) -> ApiResult<Value> {
    state.catalog.category(category_id).await?;

    let mut input = body::item_input(&body)?;
    input.category_id = Some(category_id);

    let item = state.catalog.create_item(user.id, input, None).await?;
    Ok(ApiResponse::created("Item created", json!({ "item": item })))
}

/// GET /api/category/:id/item/:item_id
pub async fn item_get(
    State(state): State<AppState>,
    Path((category_id, item_id)): Path<(i64, i64)>,
) -> ApiResult<Value> {
    let item = state.catalog.item_in_category(category_id, item_id).await?;
    Ok(ApiResponse::success("Item fetched", json!({ "item": item })))
}

/// PUT /api/category/:id/item/:item_id - partial update of name, description, price
pub async fn item_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((category_id, item_id)): Path<(i64, i64)>,
    body: Bytes,
) -> ApiResult<Value> {
    state.catalog.item_in_category(category_id, item_id).await?;

    let input = body::item_input(&body)?;
    let item = state.catalog.update_item(user.id, item_id, input, None).await?;
    Ok(ApiResponse::success("Item updated", json!({ "item": item })))
}

/// DELETE /api/category/:id/item/:item_id
pub async fn item_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((category_id, item_id)): Path<(i64, i64)>,
) -> ApiResult<Value> {
    state.catalog.item_in_category(category_id, item_id).await?;

    let item = state.catalog.delete_item(user.id, item_id).await?;
    Ok(ApiResponse::success(
        format!("Item {} deleted", item.id),
        json!({ "item": item }),
    ))
}
