//! Role entity model.
//!
//! Roles and their membership are read-only foreign state for the
//! authorization engine; the assignment helpers exist for bootstrap and
//! test setup.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named capability grouping.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier.
    pub id: Uuid,

    /// Role name, unique (e.g. "admin").
    pub name: String,
}

impl Role {
    /// Create a role, returning the existing row if the name is taken.
    pub async fn get_or_create(pool: &sqlx::PgPool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO roles (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            ",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Assign a role to a user. Idempotent.
    pub async fn assign_to_user(
        pool: &sqlx::PgPool,
        role_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Names of all roles held by a user.
    pub async fn names_for_user(
        pool: &sqlx::PgPool,
        user_id: Uuid,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r"
            SELECT r.name
            FROM roles r
            INNER JOIN user_roles ur ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
