use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::database::{
    Category, CategoryPatch, DatabaseError, Item, ItemFilter, ItemPatch, NewCategory, NewItem,
    Store,
};
use crate::storage::{PictureError, PictureManager, Upload};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error(transparent)]
    Picture(#[from] PictureError),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for CatalogError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => CatalogError::NotFound(what),
            other => CatalogError::Database(other),
        }
    }
}

impl CatalogError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Category fields as submitted by a form or JSON body, before validation
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Item fields as submitted, before validation. `price` stays textual until
/// it is parsed here so both surfaces share one rule; a submitted blank price
/// means the item has no price.
#[derive(Debug, Clone, Default)]
pub struct ItemInput {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

impl CategoryInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

impl ItemInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
    }
}

/// Category/item operations shared by the HTML pages and the JSON API.
/// Every mutation checks ownership before touching the store.
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
    pictures: PictureManager,
}

impl CatalogService {
    pub fn new(store: Store, pictures: PictureManager) -> Self {
        Self { store, pictures }
    }

    pub fn pictures(&self) -> &PictureManager {
        &self.pictures
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.store.categories().list().await?)
    }

    pub async fn category(&self, id: i64) -> Result<Category, CatalogError> {
        Ok(self.store.categories().get(id).await?)
    }

    pub async fn category_with_items(&self, id: i64) -> Result<(Category, Vec<Item>), CatalogError> {
        let category = self.category(id).await?;
        let items = self.items_in(id).await?;
        Ok((category, items))
    }

    pub async fn create_category(
        &self,
        owner: i64,
        input: CategoryInput,
        upload: Option<&Upload>,
    ) -> Result<Category, CatalogError> {
        let name = required_name(input.name)?;
        let picture = self.pictures.attach(upload).await?;

        let new = NewCategory {
            name,
            description: input.description,
            picture: picture.clone(),
            user_id: owner,
        };

        match self.store.categories().create(&new).await {
            Ok(category) => {
                tracing::info!("User {} created category {} ({})", owner, category.id, category.name);
                Ok(category)
            }
            Err(e) => {
                self.pictures.release(picture.as_deref()).await;
                Err(e.into())
            }
        }
    }

    /// Owner-only view of a category, e.g. to pre-fill an edit form
    pub async fn owned_category(&self, caller: i64, id: i64) -> Result<Category, CatalogError> {
        let category = self.category(id).await?;
        ensure_owner(caller, category.user_id, "category", id)?;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        caller: i64,
        id: i64,
        input: CategoryInput,
        upload: Option<&Upload>,
    ) -> Result<Category, CatalogError> {
        let existing = self.owned_category(caller, id).await?;

        let name = input.name.map(|n| required_name(Some(n))).transpose()?;

        // New picture goes in before the old one is released
        let new_picture = self.pictures.attach(upload).await?;
        let patch = CategoryPatch {
            name,
            description: input.description,
            picture: new_picture.clone(),
        };

        match self.store.categories().update(id, &patch).await {
            Ok(updated) => {
                if new_picture.is_some() {
                    self.pictures.release(existing.picture.as_deref()).await;
                }
                tracing::info!("User {} updated category {}", caller, id);
                Ok(updated)
            }
            Err(e) => {
                self.pictures.release(new_picture.as_deref()).await;
                Err(e.into())
            }
        }
    }

    /// Delete a category together with every item in it
    pub async fn delete_category(&self, caller: i64, id: i64) -> Result<Category, CatalogError> {
        let category = self.owned_category(caller, id).await?;

        let items = self.items_in(id).await?;
        for item in &items {
            self.pictures.release(item.picture.as_deref()).await;
            self.store.items().delete(item.id).await?;
        }

        self.pictures.release(category.picture.as_deref()).await;
        self.store.categories().delete(id).await?;

        tracing::info!(
            "User {} deleted category {} and {} item(s)",
            caller,
            id,
            items.len()
        );
        Ok(category)
    }

    // Items

    pub async fn items_in(&self, category_id: i64) -> Result<Vec<Item>, CatalogError> {
        Ok(self
            .store
            .items()
            .list(ItemFilter::in_category(category_id))
            .await?)
    }

    pub async fn item(&self, id: i64) -> Result<Item, CatalogError> {
        Ok(self.store.items().get(id).await?)
    }

    /// An item addressed through its category; a mismatch reads as not found
    pub async fn item_in_category(&self, category_id: i64, id: i64) -> Result<Item, CatalogError> {
        self.category(category_id).await?;
        let item = self.item(id).await?;
        if item.category_id != category_id {
            return Err(CatalogError::NotFound(format!(
                "item {} in category {}",
                id, category_id
            )));
        }
        Ok(item)
    }

    pub async fn owned_item(&self, caller: i64, id: i64) -> Result<Item, CatalogError> {
        let item = self.item(id).await?;
        ensure_owner(caller, item.user_id, "item", id)?;
        Ok(item)
    }

    pub async fn create_item(
        &self,
        owner: i64,
        input: ItemInput,
        upload: Option<&Upload>,
    ) -> Result<Item, CatalogError> {
        let name = required_name(input.name)?;
        let price = parse_price(input.price.as_deref())?;
        let category_id = input
            .category_id
            .ok_or_else(|| CatalogError::validation("category-id", "A category is required"))?;
        self.existing_category(category_id).await?;

        let picture = self.pictures.attach(upload).await?;
        let new = NewItem {
            name,
            price,
            description: input.description,
            picture: picture.clone(),
            category_id,
            user_id: owner,
        };

        match self.store.items().create(&new).await {
            Ok(item) => {
                tracing::info!("User {} created item {} in category {}", owner, item.id, category_id);
                Ok(item)
            }
            Err(e) => {
                self.pictures.release(picture.as_deref()).await;
                Err(e.into())
            }
        }
    }

    pub async fn update_item(
        &self,
        caller: i64,
        id: i64,
        input: ItemInput,
        upload: Option<&Upload>,
    ) -> Result<Item, CatalogError> {
        let existing = self.owned_item(caller, id).await?;

        let name = input.name.map(|n| required_name(Some(n))).transpose()?;
        let price = input
            .price
            .as_deref()
            .map(|p| parse_price(Some(p)))
            .transpose()?;
        if let Some(category_id) = input.category_id {
            self.existing_category(category_id).await?;
        }

        let new_picture = self.pictures.attach(upload).await?;
        let patch = ItemPatch {
            name,
            price,
            description: input.description,
            picture: new_picture.clone(),
            category_id: input.category_id,
        };

        match self.store.items().update(id, &patch).await {
            Ok(updated) => {
                if new_picture.is_some() {
                    self.pictures.release(existing.picture.as_deref()).await;
                }
                tracing::info!("User {} updated item {}", caller, id);
                Ok(updated)
            }
            Err(e) => {
                self.pictures.release(new_picture.as_deref()).await;
                Err(e.into())
            }
        }
    }

    pub async fn delete_item(&self, caller: i64, id: i64) -> Result<Item, CatalogError> {
        let item = self.owned_item(caller, id).await?;
        self.pictures.release(item.picture.as_deref()).await;
        self.store.items().delete(id).await?;
        tracing::info!("User {} deleted item {}", caller, id);
        Ok(item)
    }

    async fn existing_category(&self, id: i64) -> Result<Category, CatalogError> {
        match self.category(id).await {
            Err(CatalogError::NotFound(_)) => Err(CatalogError::validation(
                "category-id",
                format!("Category {} does not exist", id),
            )),
            other => other,
        }
    }
}

fn ensure_owner(caller: i64, owner: i64, kind: &str, id: i64) -> Result<(), CatalogError> {
    if caller != owner {
        tracing::warn!("User {} tried to modify {} {} owned by {}", caller, kind, id, owner);
        return Err(CatalogError::Forbidden(format!(
            "You are not authorized to modify {} {}",
            kind, id
        )));
    }
    Ok(())
}

fn required_name(name: Option<String>) -> Result<String, CatalogError> {
    match name.map(|n| n.trim().to_string()) {
        Some(n) if !n.is_empty() => Ok(n),
        _ => Err(CatalogError::validation("name", "Name is required")),
    }
}

/// Blank means "no price"; anything else must be a non-negative decimal
pub fn parse_price(price: Option<&str>) -> Result<Option<Decimal>, CatalogError> {
    let Some(text) = price.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let value = Decimal::from_str(text)
        .map_err(|_| CatalogError::validation("price", format!("'{}' is not a valid price", text)))?;
    if value.is_sign_negative() {
        return Err(CatalogError::validation("price", "Price cannot be negative"));
    }
    Ok(Some(value))
}
