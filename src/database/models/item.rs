use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub category_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Price is kept as canonical decimal text; SQLite has no decimal type.
impl<'r> FromRow<'r, SqliteRow> for Item {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let price = row
            .try_get::<Option<String>, _>("price")?
            .map(|text| {
                Decimal::from_str(&text).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "price".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price,
            description: row.try_get("description")?,
            picture: row.try_get("picture")?,
            category_id: row.try_get("category_id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub category_id: i64,
    pub user_id: i64,
}

/// Fields left as `None` keep their stored value. `price` is `Some(None)`
/// when the stored price should be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<Option<Decimal>>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category_id: Option<i64>,
}

impl ItemFilter {
    pub fn in_category(category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
        }
    }
}
