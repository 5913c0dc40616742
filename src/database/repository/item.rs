use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Item, ItemFilter, ItemPatch, NewItem};

const COLUMNS: &str =
    "id, name, price, description, picture, category_id, user_id, created_at, updated_at";

pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewItem) -> Result<Item, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO items (name, price, description, picture, category_id, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(&new.name)
            .bind(price_text(new.price))
            .bind(&new.description)
            .bind(&new.picture)
            .bind(new.category_id)
            .bind(new.user_id)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "item"))
    }

    pub async fn get(&self, id: i64) -> Result<Item, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM items WHERE id = ?");
        sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self, filter: ItemFilter) -> Result<Vec<Item>, DatabaseError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM items WHERE 1 = 1"));

        if let Some(category_id) = filter.category_id {
            query.push(" AND category_id = ").push_bind(category_id);
        }
        query.push(" ORDER BY id");

        Ok(query
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn update(&self, id: i64, patch: &ItemPatch) -> Result<Item, DatabaseError> {
        let sql = format!(
            "UPDATE items SET \
                name = COALESCE(?, name), \
                price = CASE WHEN ? THEN ? ELSE price END, \
                description = COALESCE(?, description), \
                picture = COALESCE(?, picture), \
                category_id = COALESCE(?, category_id), \
                updated_at = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(&patch.name)
            .bind(patch.price.is_some())
            .bind(price_text(patch.price.flatten()))
            .bind(&patch.description)
            .bind(&patch.picture)
            .bind(patch.category_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn price_text(price: Option<Decimal>) -> Option<String> {
    price.map(|p| p.normalize().to_string())
}

fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("item {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewCategory, NewUser};
    use crate::database::Store;
    use std::str::FromStr;

    async fn seeded() -> (Store, i64, i64) {
        let store = Store::in_memory().await.unwrap();
        let user = store
            .users()
            .create(&NewUser {
                name: "Grace".into(),
                email: "grace@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let category = store
            .categories()
            .create(&NewCategory {
                name: "Soccer".into(),
                user_id: user.id,
                ..Default::default()
            })
            .await
            .unwrap();
        (store, user.id, category.id)
    }

    #[tokio::test]
    async fn get_after_create_matches_input() {
        let (store, owner, category_id) = seeded().await;
        let repo = store.items();
        let input = NewItem {
            name: "Ball".into(),
            price: Some(Decimal::from_str("10.50").unwrap()),
            description: Some("Size 5".into()),
            picture: None,
            category_id,
            user_id: owner,
        };

        let created = repo.create(&input).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Ball");
        assert_eq!(fetched.price, input.price);
        assert_eq!(fetched.description, input.description);
        assert_eq!(fetched.category_id, category_id);
        assert_eq!(fetched.user_id, owner);
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let (store, owner, soccer) = seeded().await;
        let hockey = store
            .categories()
            .create(&NewCategory {
                name: "Hockey".into(),
                user_id: owner,
                ..Default::default()
            })
            .await
            .unwrap();
        let repo = store.items();
        for (name, category_id) in [("Ball", soccer), ("Stick", hockey.id), ("Cleats", soccer)] {
            repo.create(&NewItem {
                name: name.into(),
                category_id,
                user_id: owner,
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let soccer_items = repo.list(ItemFilter::in_category(soccer)).await.unwrap();
        let names: Vec<_> = soccer_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Ball", "Cleats"]);

        assert_eq!(repo.list(ItemFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let (store, owner, category_id) = seeded().await;
        let repo = store.items();
        let created = repo
            .create(&NewItem {
                name: "Ball".into(),
                price: Some(Decimal::from(10)),
                category_id,
                user_id: owner,
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                &ItemPatch {
                    price: Some(Some(Decimal::from_str("12.00").unwrap())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ball");
        assert_eq!(updated.price, Some(Decimal::from(12)));
    }

    #[tokio::test]
    async fn update_can_clear_price() {
        let (store, owner, category_id) = seeded().await;
        let repo = store.items();
        let created = repo
            .create(&NewItem {
                name: "Ball".into(),
                price: Some(Decimal::from(10)),
                description: Some("Size 5".into()),
                category_id,
                user_id: owner,
                ..Default::default()
            })
            .await
            .unwrap();

        let untouched = repo.update(created.id, &ItemPatch::default()).await.unwrap();
        assert_eq!(untouched.price, Some(Decimal::from(10)));

        let cleared = repo
            .update(
                created.id,
                &ItemPatch {
                    price: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.price, None);
        assert_eq!(cleared.description.as_deref(), Some("Size 5"));
        assert_eq!(repo.get(created.id).await.unwrap().price, None);
    }

    #[tokio::test]
    async fn item_requires_existing_category() {
        let (store, owner, _) = seeded().await;
        let result = store
            .items()
            .create(&NewItem {
                name: "Ghost".into(),
                category_id: 404,
                user_id: owner,
                ..Default::default()
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let (store, owner, category_id) = seeded().await;
        let repo = store.items();
        let item = repo
            .create(&NewItem {
                name: "Ball".into(),
                category_id,
                user_id: owner,
                ..Default::default()
            })
            .await
            .unwrap();

        repo.delete(item.id).await.unwrap();
        assert!(matches!(repo.delete(item.id).await, Err(DatabaseError::NotFound(_))));
    }
}
