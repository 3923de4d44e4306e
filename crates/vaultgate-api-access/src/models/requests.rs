//! Request payloads for the access API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Body of `POST /access/reconcile`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReconcilePermissionsRequest {
    /// The user requesting the change.
    pub requester_id: Uuid,

    /// The user whose permission set is being reconciled.
    pub target_user_id: Uuid,

    /// The complete desired permission set. Permissions the target holds
    /// but that are absent here are revoked; an empty list revokes
    /// everything.
    pub permissions: Vec<Uuid>,
}

/// Body of `POST /access/check`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckAccessRequest {
    /// The subject of the check.
    pub user_id: Uuid,

    /// The permission being checked.
    pub permission_id: Uuid,
}

/// Query parameters of `GET /access/history`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// The user requesting the history.
    pub requester_id: Uuid,

    /// The user whose history is requested; omit for all users
    /// (privileged requesters only).
    pub user_id: Option<Uuid>,

    /// Maximum number of entries to return. Absent or non-positive
    /// values fall back to the server default.
    pub limit: Option<i64>,
}
