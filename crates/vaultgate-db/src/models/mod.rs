//! Entity models.

pub mod authorization_log;
pub mod permission;
pub mod role;
pub mod user;
pub mod user_permission;

pub use authorization_log::{AuthorizationLog, NewAuthorizationLog};
pub use permission::Permission;
pub use role::Role;
pub use user::User;
pub use user_permission::UserPermission;
