//! Core types shared across the vaultgate crates.
//!
//! Currently this is the home of the strongly typed identifiers used at
//! every engine boundary. Keeping them in a leaf crate lets both the
//! storage layer and the API surface agree on the same types without a
//! dependency cycle.

pub mod ids;

pub use ids::{ParseIdError, PermissionId, UserId};
