use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, CategoryPatch, NewCategory};

const COLUMNS: &str = "id, name, description, picture, user_id, created_at, updated_at";

pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewCategory) -> Result<Category, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO categories (name, description, picture, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(&new.name)
            .bind(&new.description)
            .bind(&new.picture)
            .bind(new.user_id)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "category"))
    }

    pub async fn get(&self, id: i64) -> Result<Category, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = ?");
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Category>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM categories ORDER BY id");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn update(&self, id: i64, patch: &CategoryPatch) -> Result<Category, DatabaseError> {
        let sql = format!(
            "UPDATE categories SET \
                name = COALESCE(?, name), \
                description = COALESCE(?, description), \
                picture = COALESCE(?, picture), \
                updated_at = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(&patch.picture)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("category {}", id))
}
