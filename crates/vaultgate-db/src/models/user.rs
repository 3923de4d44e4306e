//! User entity model.
//!
//! The engine only consults user existence; user lifecycle itself is
//! managed elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user account.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,

    /// Login name, unique.
    pub username: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user.
    pub async fn create(pool: &sqlx::PgPool, username: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO users (username)
            VALUES ($1)
            RETURNING *
            ",
        )
        .bind(username)
        .fetch_one(pool)
        .await
    }

    /// Check whether a user with this id exists.
    pub async fn exists(pool: &sqlx::PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            r"
            SELECT 1 FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.is_some())
    }
}
