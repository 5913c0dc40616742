// handlers/pages/catalog.rs - read-only catalog pages

use axum::{
    extract::{Path, State},
    response::Html,
    Extension,
};

use crate::database::{Category, Item};
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::views::{page_context, render, PageError};

/// GET / - all categories, with the items of the first one
pub async fn catalog_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Html<String>, PageError> {
    let categories = state.catalog.list_categories().await?;
    let selected = categories.first().cloned();
    let items = match &selected {
        Some(category) => state.catalog.items_in(category.id).await?,
        None => Vec::new(),
    };

    render_catalog(&current, &categories, selected.as_ref(), &items)
}

/// GET /category/:id - all categories, with the items of this one
pub async fn category_view_get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let (selected, items) = state.catalog.category_with_items(id).await?;
    let categories = state.catalog.list_categories().await?;

    render_catalog(&current, &categories, Some(&selected), &items)
}

fn render_catalog(
    current: &CurrentUser,
    categories: &[Category],
    selected: Option<&Category>,
    items: &[Item],
) -> Result<Html<String>, PageError> {
    let mut context = page_context(current);
    context.insert("categories", categories);
    context.insert("selected", &selected);
    context.insert("items", items);
    render("catalog.html", &context)
}
