//! Authorization log entity model.
//!
//! One row per access-decision evaluation. Append-only: no update or
//! delete statements exist for this table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable record of one access-decision evaluation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuthorizationLog {
    /// Unique identifier of the entry.
    pub id: Uuid,

    /// The subject of the evaluation.
    pub user_id: Uuid,

    /// The permission that was checked.
    pub permission_id: Uuid,

    /// Whether access was granted.
    pub success: bool,

    /// When the evaluation happened.
    pub created_at: DateTime<Utc>,
}

/// Input for appending a log entry.
#[derive(Debug, Clone, Copy)]
pub struct NewAuthorizationLog {
    pub user_id: Uuid,
    pub permission_id: Uuid,
    pub success: bool,
}

impl AuthorizationLog {
    /// Append an entry.
    pub async fn append(
        pool: &sqlx::PgPool,
        entry: NewAuthorizationLog,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO authorization_log (user_id, permission_id, success)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(entry.user_id)
        .bind(entry.permission_id)
        .bind(entry.success)
        .fetch_one(pool)
        .await
    }

    /// List entries, newest first, for one user or for all users.
    ///
    /// `limit` bounds the result; callers are expected to pass a positive
    /// value.
    pub async fn list(
        pool: &sqlx::PgPool,
        user_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if let Some(user_id) = user_id {
            return sqlx::query_as(
                r"
                SELECT * FROM authorization_log
                WHERE user_id = $1
                ORDER BY created_at DESC
                LIMIT $2
                ",
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await;
        }

        sqlx::query_as(
            r"
            SELECT * FROM authorization_log
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
