//! Response payloads for the access API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use vaultgate_authorization::{AccessDecision, ReconcileReport};
use vaultgate_db::models::AuthorizationLog;

/// Confirmation of a fully applied reconciliation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReconcileResponse {
    /// The reconciled user.
    pub target_user_id: Uuid,

    /// Permissions granted by this run.
    pub granted: Vec<Uuid>,

    /// Permissions revoked by this run.
    pub revoked: Vec<Uuid>,

    /// Human-readable confirmation naming the target.
    pub message: String,
}

impl From<ReconcileReport> for ReconcileResponse {
    fn from(report: ReconcileReport) -> Self {
        let message = format!(
            "Authorization updated for user {}",
            report.target_user_id
        );
        Self {
            target_user_id: *report.target_user_id.as_uuid(),
            granted: report.granted.iter().map(|id| *id.as_uuid()).collect(),
            revoked: report.revoked.iter().map(|id| *id.as_uuid()).collect(),
            message,
        }
    }
}

/// Outcome of an access check. Returned with status 200 for both
/// outcomes; denial is a decision, not an error.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckAccessResponse {
    /// Whether the subject holds the permission.
    pub authorized: bool,

    /// Human-readable outcome.
    pub message: String,
}

impl From<AccessDecision> for CheckAccessResponse {
    fn from(decision: AccessDecision) -> Self {
        let message = if decision.authorized {
            "Access granted".to_string()
        } else {
            "Access denied".to_string()
        };
        Self {
            authorized: decision.authorized,
            message,
        }
    }
}

/// One authorization log entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogEntryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub permission_id: Uuid,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AuthorizationLog> for LogEntryResponse {
    fn from(entry: AuthorizationLog) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            permission_id: entry.permission_id,
            success: entry.success,
            created_at: entry.created_at,
        }
    }
}
