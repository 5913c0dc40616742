// handlers/protected/category.rs - category endpoints of the JSON API

use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::body;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/categories - every category
pub async fn categories_get(State(state): State<AppState>) -> ApiResult<Value> {
    let categories = state.catalog.list_categories().await?;
    Ok(ApiResponse::success(
        "Categories fetched",
        json!({ "categories": categories }),
    ))
}

/// POST /api/categories - create a category owned by the caller
pub async fn categories_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<Value> {
    let input = body::category_input(&body)?;
    let category = state.catalog.create_category(user.id, input, None).await?;
    Ok(ApiResponse::created(
        "Category created",
        json!({ "category": category }),
    ))
}

/// GET /api/category/:id - one category and its items
pub async fn category_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    let (category, items) = state.catalog.category_with_items(id).await?;
    Ok(ApiResponse::success(
        "Category fetched",
        json!({ "category": category, "items": items }),
    ))
}

/// PUT /api/category/:id - partial update of name and/or description
pub async fn category_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Bytes,
) -> ApiResult<Value> {
    let input = body::category_input(&body)?;
    let category = state.catalog.update_category(user.id, id, input, None).await?;
    Ok(ApiResponse::success(
        "Category updated",
        json!({ "category": category }),
    ))
}

/// DELETE /api/category/:id - delete a category with all of its items
pub async fn category_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    let category = state.catalog.delete_category(user.id, id).await?;
    Ok(ApiResponse::success(
        format!("Category {} deleted", category.id),
        json!({ "category": category }),
    ))
}
