//! Reconciliation orchestration.
//!
//! Brings a target user's permission set to exactly match a requested
//! set: validate, authorize the requester, diff against the store, then
//! fan out the grant/revoke mutations concurrently. Mutations are
//! independent per pair; there is no batch atomicity and no rollback, so
//! a partially applied batch is reported as such rather than collapsed
//! into a blanket success or failure.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use vaultgate_core::{PermissionId, UserId};

use crate::diff::PermissionDiff;
use crate::error::{AuthorizationError, Result};
use crate::gate::AuthorizationGate;
use crate::store::PermissionStore;

/// Direction of a single permission mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Grant,
    Revoke,
}

impl Display for MutationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::Grant => write!(f, "grant"),
            MutationKind::Revoke => write!(f, "revoke"),
        }
    }
}

/// A mutation that was applied successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedMutation {
    pub kind: MutationKind,
    pub permission_id: PermissionId,
}

/// A mutation that failed to apply.
#[derive(Debug, Clone, Serialize)]
pub struct FailedMutation {
    pub kind: MutationKind,
    pub permission_id: PermissionId,
    pub error: String,
}

/// Per-mutation outcome of an apply phase that did not fully succeed.
#[derive(Debug, Clone, Serialize)]
pub struct PartialApplyReport {
    /// The user whose permission set was being reconciled.
    pub target_user_id: UserId,
    /// Mutations that were applied before or alongside the failures.
    pub applied: Vec<AppliedMutation>,
    /// Mutations that failed.
    pub failed: Vec<FailedMutation>,
}

impl Display for PartialApplyReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Partially applied permission reconciliation for user {}: {} of {} mutations succeeded",
            self.target_user_id,
            self.applied.len(),
            self.applied.len() + self.failed.len()
        )
    }
}

/// Confirmation of a fully applied reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// The reconciled user.
    pub target_user_id: UserId,
    /// Permissions granted by this run.
    pub granted: Vec<PermissionId>,
    /// Permissions revoked by this run.
    pub revoked: Vec<PermissionId>,
}

/// Orchestrates permission reconciliation end to end.
///
/// No per-target lock is held across the read-diff-write sequence; two
/// concurrent reconciliations of the same user can race. Callers needing
/// strict consistency must serialize per target externally.
pub struct ReconciliationService {
    store: Arc<dyn PermissionStore>,
    gate: AuthorizationGate,
}

impl ReconciliationService {
    pub fn new(store: Arc<dyn PermissionStore>, gate: AuthorizationGate) -> Self {
        Self { store, gate }
    }

    /// Bring `target_user_id`'s permission set to exactly `desired`.
    ///
    /// An empty `desired` set is a full revocation. Reconciling a set
    /// the user already holds is a no-op and issues no mutations.
    ///
    /// # Errors
    ///
    /// Denials and validation failures from
    /// [`AuthorizationGate::authorize_reconcile`] abort before any
    /// read; a store failure while reading the current set aborts with
    /// `Store` and no effects; failures during the apply phase surface
    /// as `PartialApply` carrying every per-mutation outcome.
    pub async fn reconcile(
        &self,
        requester_id: UserId,
        target_user_id: UserId,
        desired: HashSet<PermissionId>,
    ) -> Result<ReconcileReport> {
        self.gate
            .authorize_reconcile(requester_id, target_user_id)
            .await?;

        let current = self.store.fetch_permissions(target_user_id).await?;
        let diff = PermissionDiff::between(&current, &desired);

        tracing::info!(
            requester_id = %requester_id,
            target_user_id = %target_user_id,
            grants = diff.to_grant.len(),
            revokes = diff.to_revoke.len(),
            "Applying permission reconciliation"
        );

        let mutations: Vec<(MutationKind, PermissionId)> = diff
            .to_revoke
            .iter()
            .map(|id| (MutationKind::Revoke, *id))
            .chain(diff.to_grant.iter().map(|id| (MutationKind::Grant, *id)))
            .collect();

        let outcomes = join_all(mutations.into_iter().map(|(kind, permission_id)| {
            let store = Arc::clone(&self.store);
            async move {
                let result = match kind {
                    MutationKind::Grant => {
                        store.grant_permission(target_user_id, permission_id).await
                    }
                    MutationKind::Revoke => {
                        store.revoke_permission(target_user_id, permission_id).await
                    }
                };
                (kind, permission_id, result)
            }
        }))
        .await;

        let mut applied = Vec::new();
        let mut failed = Vec::new();
        for (kind, permission_id, result) in outcomes {
            match result {
                Ok(()) => applied.push(AppliedMutation {
                    kind,
                    permission_id,
                }),
                Err(e) => {
                    tracing::error!(
                        target_user_id = %target_user_id,
                        permission_id = %permission_id,
                        mutation = %kind,
                        error = %e,
                        "Permission mutation failed"
                    );
                    failed.push(FailedMutation {
                        kind,
                        permission_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        if !failed.is_empty() {
            return Err(AuthorizationError::PartialApply(PartialApplyReport {
                target_user_id,
                applied,
                failed,
            }));
        }

        let mut granted = Vec::new();
        let mut revoked = Vec::new();
        for mutation in applied {
            match mutation.kind {
                MutationKind::Grant => granted.push(mutation.permission_id),
                MutationKind::Revoke => revoked.push(mutation.permission_id),
            }
        }

        tracing::info!(
            target_user_id = %target_user_id,
            granted = granted.len(),
            revoked = revoked.len(),
            "Permission reconciliation complete"
        );

        Ok(ReconcileReport {
            target_user_id,
            granted,
            revoked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::PrivilegedRoles;
    use crate::store::InMemoryPermissionStore;

    fn set(ids: &[PermissionId]) -> HashSet<PermissionId> {
        ids.iter().copied().collect()
    }

    fn service_over(store: Arc<InMemoryPermissionStore>) -> ReconciliationService {
        let gate = AuthorizationGate::new(store.clone(), PrivilegedRoles::default());
        ReconciliationService::new(store, gate)
    }

    async fn seeded_admin_and_target(
        store: &InMemoryPermissionStore,
        held: &[PermissionId],
    ) -> (UserId, UserId) {
        let admin = UserId::new();
        let target = UserId::new();
        store.add_user_with_role(admin, "admin").await;
        store.add_user(target).await;
        for permission in held {
            store.seed_permission(target, *permission).await;
        }
        (admin, target)
    }

    #[tokio::test]
    async fn test_reconcile_reaches_exactly_the_desired_set() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let p1 = PermissionId::new();
        let p2 = PermissionId::new();
        let p3 = PermissionId::new();
        let (admin, target) = seeded_admin_and_target(&store, &[p1, p2]).await;

        let service = service_over(store.clone());
        let report = service
            .reconcile(admin, target, set(&[p2, p3]))
            .await
            .unwrap();

        assert_eq!(report.target_user_id, target);
        assert_eq!(report.granted, vec![p3]);
        assert_eq!(report.revoked, vec![p1]);
        assert_eq!(store.fetch_permissions(target).await.unwrap(), set(&[p2, p3]));
    }

    #[tokio::test]
    async fn test_second_reconcile_is_a_noop() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let p1 = PermissionId::new();
        let p2 = PermissionId::new();
        let (admin, target) = seeded_admin_and_target(&store, &[p1]).await;

        let service = service_over(store.clone());
        let desired = set(&[p1, p2]);

        let first = service
            .reconcile(admin, target, desired.clone())
            .await
            .unwrap();
        assert_eq!(first.granted, vec![p2]);

        let second = service.reconcile(admin, target, desired.clone()).await.unwrap();
        assert!(second.granted.is_empty());
        assert!(second.revoked.is_empty());
        assert_eq!(store.fetch_permissions(target).await.unwrap(), desired);
    }

    #[tokio::test]
    async fn test_empty_desired_set_revokes_everything() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let p1 = PermissionId::new();
        let p2 = PermissionId::new();
        let (admin, target) = seeded_admin_and_target(&store, &[p1, p2]).await;

        let service = service_over(store.clone());
        let report = service.reconcile(admin, target, HashSet::new()).await.unwrap();

        assert!(report.granted.is_empty());
        assert_eq!(report.revoked.len(), 2);
        assert!(store.fetch_permissions(target).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_denied_requester_changes_nothing() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let held = PermissionId::new();
        let target = UserId::new();
        let requester = UserId::new();
        store.add_user_with_role(requester, "member").await;
        store.add_user(target).await;
        store.seed_permission(target, held).await;

        let service = service_over(store.clone());
        let err = service
            .reconcile(requester, target, set(&[PermissionId::new()]))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthorizationError::InsufficientRole));
        assert_eq!(store.fetch_permissions(target).await.unwrap(), set(&[held]));
    }

    #[tokio::test]
    async fn test_self_reconciliation_is_rejected_before_role_checks() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let admin = UserId::new();
        store.add_user_with_role(admin, "admin").await;

        let service = service_over(store.clone());
        let err = service
            .reconcile(admin, admin, set(&[PermissionId::new()]))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthorizationError::SelfModificationDenied));
        assert!(store.fetch_permissions(admin).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_aborts_without_effects() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let held = PermissionId::new();
        let (admin, target) = seeded_admin_and_target(&store, &[held]).await;
        store.fail_permission_reads(true).await;

        let service = service_over(store.clone());
        let err = service
            .reconcile(admin, target, HashSet::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthorizationError::Store(_)));
        store.fail_permission_reads(false).await;
        assert_eq!(store.fetch_permissions(target).await.unwrap(), set(&[held]));
    }

    #[tokio::test]
    async fn test_partial_apply_reports_both_subsets() {
        let store = Arc::new(InMemoryPermissionStore::new());
        let p1 = PermissionId::new();
        let p2 = PermissionId::new();
        let p3 = PermissionId::new();
        let (admin, target) = seeded_admin_and_target(&store, &[p1, p2]).await;
        store.fail_grant_of(p3).await;

        let service = service_over(store.clone());
        let err = service
            .reconcile(admin, target, set(&[p2, p3]))
            .await
            .unwrap_err();

        let AuthorizationError::PartialApply(report) = err else {
            panic!("expected PartialApply, got {err:?}");
        };
        assert_eq!(report.target_user_id, target);
        assert_eq!(
            report.applied,
            vec![AppliedMutation {
                kind: MutationKind::Revoke,
                permission_id: p1
            }]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].permission_id, p3);
        assert_eq!(report.failed[0].kind, MutationKind::Grant);

        // The revoke landed; the failed grant left the rest untouched.
        assert_eq!(store.fetch_permissions(target).await.unwrap(), set(&[p2]));
    }

    #[tokio::test]
    async fn test_report_display_counts_mutations() {
        let report = PartialApplyReport {
            target_user_id: UserId::new(),
            applied: vec![AppliedMutation {
                kind: MutationKind::Revoke,
                permission_id: PermissionId::new(),
            }],
            failed: vec![FailedMutation {
                kind: MutationKind::Grant,
                permission_id: PermissionId::new(),
                error: "boom".to_string(),
            }],
        };
        assert!(report.to_string().contains("1 of 2 mutations succeeded"));
    }
}
