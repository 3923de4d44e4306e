//! Error types for the authorization engine.

use thiserror::Error;
use vaultgate_core::UserId;

use crate::reconcile::PartialApplyReport;

/// Errors that can occur while authorizing or reconciling permissions.
///
/// Authorization denials and infrastructure failures are distinct
/// variants on purpose: callers and auditors must be able to tell "you
/// are not allowed" apart from "the system is broken".
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// A required identifier or field is missing or malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A requester attempted to reconcile their own permission set.
    #[error("Requesters may not modify their own permissions")]
    SelfModificationDenied,

    /// The requester holds no role entitled to reconcile permissions.
    #[error("Requester lacks a role entitled to update permissions")]
    InsufficientRole,

    /// The reconciliation target does not exist.
    #[error("Target user not found: {0}")]
    TargetNotFound(UserId),

    /// Generic denial for history access.
    #[error("Forbidden")]
    Forbidden,

    /// The backing store was unavailable or a query failed.
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Some, but not all, of the diffed mutations were applied.
    #[error("{0}")]
    PartialApply(PartialApplyReport),
}

impl AuthorizationError {
    /// True for variants that represent a policy denial rather than an
    /// infrastructure failure.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AuthorizationError::SelfModificationDenied
                | AuthorizationError::InsufficientRole
                | AuthorizationError::Forbidden
        )
    }
}

/// Convenience Result type for the authorization engine.
pub type Result<T> = std::result::Result<T, AuthorizationError>;
