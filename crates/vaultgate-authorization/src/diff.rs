//! Permission diff engine.
//!
//! Pure set arithmetic between a user's current assignment set and the
//! requested target set. The apply phase lives in [`crate::reconcile`].

use std::collections::HashSet;

use vaultgate_core::PermissionId;

/// The minimal mutation set moving `current` to `desired`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionDiff {
    /// Permissions present in `desired` but not in `current`.
    pub to_grant: HashSet<PermissionId>,

    /// Permissions present in `current` but not in `desired`.
    pub to_revoke: HashSet<PermissionId>,
}

impl PermissionDiff {
    /// Compute the diff between the current and desired assignment sets.
    ///
    /// Deterministic and side-effect free. Applying the resulting grants
    /// and revokes yields exactly `desired`; diffing `desired` against
    /// itself yields the empty diff, which is what makes reconciliation
    /// idempotent.
    #[must_use]
    pub fn between(current: &HashSet<PermissionId>, desired: &HashSet<PermissionId>) -> Self {
        Self {
            to_grant: desired.difference(current).copied().collect(),
            to_revoke: current.difference(desired).copied().collect(),
        }
    }

    /// True when no mutations are needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_grant.is_empty() && self.to_revoke.is_empty()
    }

    /// Total number of mutations in the diff.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_grant.len() + self.to_revoke.len()
    }
}
