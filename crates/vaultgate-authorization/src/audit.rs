//! Audit trail for access decisions.
//!
//! Every access-decision evaluation is recorded through here. A failed
//! append is diverted to the operational log instead of the response
//! path: the decision already computed must reach the caller even when
//! the audit backend is down.

use std::sync::Arc;

use vaultgate_core::{PermissionId, UserId};
use vaultgate_db::models::NewAuthorizationLog;

use crate::store::PermissionStore;

/// Appends one immutable log entry per access-decision evaluation.
pub struct AuditLogger {
    store: Arc<dyn PermissionStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Record the outcome of one access-decision evaluation.
    ///
    /// Best effort: an append failure is emitted as a structured error
    /// event on the `authorization` target and otherwise swallowed, so
    /// the caller's response never depends on the audit write.
    pub async fn record(&self, user_id: UserId, permission_id: PermissionId, success: bool) {
        let entry = NewAuthorizationLog {
            user_id: *user_id.as_uuid(),
            permission_id: *permission_id.as_uuid(),
            success,
        };

        match self.store.append_log(entry).await {
            Ok(record) => {
                tracing::info!(
                    target: "authorization",
                    entry_id = %record.id,
                    user_id = %user_id,
                    permission_id = %permission_id,
                    success,
                    "access decision recorded"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: "authorization",
                    user_id = %user_id,
                    permission_id = %permission_id,
                    success,
                    error = %e,
                    "failed to record access decision"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPermissionStore;

    #[tokio::test]
    async fn test_record_appends_one_entry() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let logger = AuditLogger::new(store.clone());
        let user = UserId::new();
        let permission = PermissionId::new();

        logger.record(user, permission, true).await;

        let entries = store.logged_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, *user.as_uuid());
        assert_eq!(entries[0].permission_id, *permission.as_uuid());
        assert!(entries[0].success);
    }

    #[tokio::test]
    async fn test_append_failure_is_swallowed() {
        let store = Arc::new(InMemoryPermissionStore::new());
        store.fail_log_appends(true).await;
        let logger = AuditLogger::new(store.clone());

        // Must not panic or propagate; the error goes to tracing.
        logger.record(UserId::new(), PermissionId::new(), false).await;

        assert!(store.logged_entries().await.is_empty());
    }
}
