//! Access decision engine.
//!
//! Answers "does this user currently hold this permission". Distinct
//! from [`crate::gate`], which answers "may this requester change
//! permissions". No role check happens here.

use std::sync::Arc;

use vaultgate_core::{PermissionId, UserId};

use crate::audit::AuditLogger;
use crate::store::PermissionStore;

/// Outcome of one access-decision evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether the subject holds the requested permission.
    pub authorized: bool,
}

/// Fail-closed permission check.
pub struct AccessDecisionEngine {
    store: Arc<dyn PermissionStore>,
    audit: AuditLogger,
}

impl AccessDecisionEngine {
    pub fn new(store: Arc<dyn PermissionStore>, audit: AuditLogger) -> Self {
        Self { store, audit }
    }

    /// Evaluate whether `user_id` holds `permission_id`.
    ///
    /// Infallible on purpose: a missing subject, an empty assignment
    /// set, or a store failure all resolve to `authorized: false`, never
    /// to an error and never to an implicit allow. Exactly one audit
    /// entry is recorded per evaluation, whatever the outcome.
    pub async fn decide(&self, user_id: UserId, permission_id: PermissionId) -> AccessDecision {
        let authorized = match self.store.fetch_permissions(user_id).await {
            Ok(assignments) => assignments.contains(&permission_id),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    permission_id = %permission_id,
                    error = %e,
                    "Permission lookup failed; denying access"
                );
                false
            }
        };

        self.audit.record(user_id, permission_id, authorized).await;

        AccessDecision { authorized }
    }
}
