//! Permission reconciliation and authorization engine.
//!
//! Decides whether a subject currently holds a guarded permission
//! (fail-closed), lets privileged requesters reconcile another user's
//! permission set to a desired target via minimal grant/revoke mutations,
//! and records every access decision in an append-only audit trail.
//!
//! All components consume storage through the [`store::PermissionStore`]
//! abstraction, injected at construction. Nothing in this crate touches a
//! transport layer.

pub mod audit;
pub mod decision;
pub mod diff;
pub mod error;
pub mod gate;
pub mod history;
pub mod reconcile;
pub mod store;

pub use audit::AuditLogger;
pub use decision::{AccessDecision, AccessDecisionEngine};
pub use diff::PermissionDiff;
pub use error::{AuthorizationError, Result};
pub use gate::{AuthorizationGate, PrivilegedRoles};
pub use history::{HistoryService, DEFAULT_HISTORY_LIMIT};
pub use reconcile::{
    AppliedMutation, FailedMutation, MutationKind, PartialApplyReport, ReconcileReport,
    ReconciliationService,
};
pub use store::{InMemoryPermissionStore, PermissionStore, PgPermissionStore};
