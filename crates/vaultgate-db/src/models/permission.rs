//! Permission entity model.
//!
//! Permission definitions are read-only foreign state for the engine;
//! `get_or_create` exists for bootstrap and test setup.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A guarded capability.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Permission {
    /// Unique identifier.
    pub id: Uuid,

    /// Permission name, unique.
    pub name: String,
}

impl Permission {
    /// Create a permission, returning the existing row if the name is taken.
    pub async fn get_or_create(pool: &sqlx::PgPool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO permissions (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            ",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }
}
