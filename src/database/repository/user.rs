use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};

const COLUMNS: &str = "id, name, email, picture, password_hash, provider_subject, created_at";

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (name, email, picture, password_hash, provider_subject, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.picture)
            .bind(&new.password_hash)
            .bind(&new.provider_subject)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "user with this email"))
    }

    pub async fn get(&self, id: i64) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = ?");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Refresh the profile fields reported by the identity provider on each login
    pub async fn update_profile(
        &self,
        id: i64,
        name: &str,
        picture: Option<&str>,
        provider_subject: &str,
    ) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET name = ?, picture = COALESCE(?, picture), provider_subject = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .bind(picture)
            .bind(provider_subject)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))
    }
}
