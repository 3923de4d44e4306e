//! Relational storage layer for vaultgate.
//!
//! Entity models over sqlx/Postgres plus pool construction and embedded
//! migrations. This crate knows SQL and nothing about authorization
//! policy; the engine crate consumes it through the `PermissionStore`
//! abstraction.

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use models::{
    AuthorizationLog, NewAuthorizationLog, Permission, Role, User, UserPermission,
};
pub use pool::DbPool;
