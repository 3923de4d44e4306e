//! Authorization history retrieval.

use std::sync::Arc;

use vaultgate_core::UserId;
use vaultgate_db::models::AuthorizationLog;

use crate::error::Result;
use crate::gate::AuthorizationGate;
use crate::store::PermissionStore;

/// Result-set bound applied when no usable limit is supplied, so a
/// single response can never trigger an unbounded store scan.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Gated read access to the authorization log.
pub struct HistoryService {
    store: Arc<dyn PermissionStore>,
    gate: AuthorizationGate,
}

impl HistoryService {
    pub fn new(store: Arc<dyn PermissionStore>, gate: AuthorizationGate) -> Self {
        Self { store, gate }
    }

    /// Fetch log entries for one user, or for all users when `target` is
    /// `None`, newest first.
    ///
    /// Absent or non-positive limits are clamped to
    /// [`DEFAULT_HISTORY_LIMIT`].
    ///
    /// # Errors
    ///
    /// `Forbidden` when the requester may not view the requested
    /// history; `Store` when the lookup fails.
    pub async fn fetch(
        &self,
        requester_id: UserId,
        target: Option<UserId>,
        limit: Option<i64>,
    ) -> Result<Vec<AuthorizationLog>> {
        self.gate.authorize_history(requester_id, target).await?;

        let limit = match limit {
            Some(value) if value > 0 => value,
            _ => DEFAULT_HISTORY_LIMIT,
        };

        self.store.fetch_logs(target, limit).await
    }
}
