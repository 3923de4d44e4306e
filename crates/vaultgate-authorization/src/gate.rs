//! Role-based gates for privileged operations.
//!
//! [`AuthorizationGate`] answers "may this requester change another
//! user's permissions" and "may this requester read these logs". It is
//! read-only: callers perform mutations only after an allow.

use std::collections::HashSet;
use std::sync::Arc;

use vaultgate_core::UserId;

use crate::error::{AuthorizationError, Result};
use crate::store::PermissionStore;

/// Configurable allow-lists of roles entitled to privileged operations.
#[derive(Debug, Clone)]
pub struct PrivilegedRoles {
    reconcile: HashSet<String>,
    history: HashSet<String>,
}

impl PrivilegedRoles {
    /// Build allow-lists for reconciliation and history access.
    pub fn new<R, H>(reconcile: R, history: H) -> Self
    where
        R: IntoIterator<Item = String>,
        H: IntoIterator<Item = String>,
    {
        Self {
            reconcile: reconcile.into_iter().collect(),
            history: history.into_iter().collect(),
        }
    }

    /// Whether any of `roles` is entitled to reconcile permissions.
    #[must_use]
    pub fn may_reconcile(&self, roles: &[String]) -> bool {
        roles.iter().any(|role| self.reconcile.contains(role))
    }

    /// Whether any of `roles` is entitled to broad log access.
    #[must_use]
    pub fn may_view_history(&self, roles: &[String]) -> bool {
        roles.iter().any(|role| self.history.contains(role))
    }
}

impl Default for PrivilegedRoles {
    /// Both operations restricted to the "admin" role.
    fn default() -> Self {
        Self::new(["admin".to_string()], ["admin".to_string()])
    }
}

/// Gate deciding whether a requester may perform a privileged operation.
pub struct AuthorizationGate {
    store: Arc<dyn PermissionStore>,
    privileged: PrivilegedRoles,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn PermissionStore>, privileged: PrivilegedRoles) -> Self {
        Self { store, privileged }
    }

    /// Decide whether `requester_id` may reconcile the permission set of
    /// `target_user_id`.
    ///
    /// Checks short-circuit in a fixed order: missing identifiers, then
    /// self-modification (before any role lookup, so an admin cannot
    /// elevate themselves either), then role entitlement, then target
    /// existence.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when either identifier is nil.
    /// - `SelfModificationDenied` when requester and target coincide.
    /// - `InsufficientRole` when the requester holds no entitled role.
    /// - `TargetNotFound` when the target user does not exist.
    /// - `Store` when a role or existence lookup fails; the caller must
    ///   not assume authorization either way.
    pub async fn authorize_reconcile(
        &self,
        requester_id: UserId,
        target_user_id: UserId,
    ) -> Result<()> {
        if requester_id.is_nil() {
            return Err(AuthorizationError::InvalidRequest(
                "requester id is missing".to_string(),
            ));
        }
        if target_user_id.is_nil() {
            return Err(AuthorizationError::InvalidRequest(
                "target user id is missing".to_string(),
            ));
        }

        if requester_id == target_user_id {
            tracing::warn!(
                requester_id = %requester_id,
                "Reconciliation denied: requester targeted their own permissions"
            );
            return Err(AuthorizationError::SelfModificationDenied);
        }

        let roles = self.store.fetch_roles(requester_id).await?;
        if !self.privileged.may_reconcile(&roles) {
            tracing::warn!(
                requester_id = %requester_id,
                roles = ?roles,
                "Reconciliation denied: no entitled role"
            );
            return Err(AuthorizationError::InsufficientRole);
        }

        if !self.store.user_exists(target_user_id).await? {
            return Err(AuthorizationError::TargetNotFound(target_user_id));
        }

        tracing::debug!(
            requester_id = %requester_id,
            target_user_id = %target_user_id,
            "Reconciliation authorized"
        );
        Ok(())
    }

    /// Decide whether `requester_id` may read the authorization history
    /// of `target`.
    ///
    /// Self-view is always permitted. Anything else, whether another
    /// user's history or the all-users feed (`target = None`), requires
    /// a privileged history role.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when the requester id is nil.
    /// - `Forbidden` when the requester is not entitled.
    /// - `Store` when the role lookup fails.
    pub async fn authorize_history(
        &self,
        requester_id: UserId,
        target: Option<UserId>,
    ) -> Result<()> {
        if requester_id.is_nil() {
            return Err(AuthorizationError::InvalidRequest(
                "requester id is missing".to_string(),
            ));
        }

        if target == Some(requester_id) {
            return Ok(());
        }

        let roles = self.store.fetch_roles(requester_id).await?;
        if !self.privileged.may_view_history(&roles) {
            tracing::warn!(
                requester_id = %requester_id,
                target_user_id = ?target,
                "History access denied"
            );
            return Err(AuthorizationError::Forbidden);
        }

        Ok(())
    }
}
