//! Permission assignment model.
//!
//! Existence of a row is the grant. The `(user_id, permission_id)`
//! primary key keeps the assignment set duplicate-free.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A permission granted to a user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserPermission {
    /// The user holding the permission.
    pub user_id: Uuid,

    /// The granted permission.
    pub permission_id: Uuid,

    /// When the grant was created.
    pub granted_at: DateTime<Utc>,
}

impl UserPermission {
    /// All permission ids currently assigned to a user.
    pub async fn permission_ids_for_user(
        pool: &sqlx::PgPool,
        user_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r"
            SELECT permission_id
            FROM user_permissions
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Grant a permission to a user. Idempotent.
    pub async fn grant(
        pool: &sqlx::PgPool,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO user_permissions (user_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, permission_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Revoke a permission from a user.
    ///
    /// Returns whether a grant row was actually removed.
    pub async fn revoke(
        pool: &sqlx::PgPool,
        user_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            DELETE FROM user_permissions
            WHERE user_id = $1
            AND permission_id = $2
            ",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
