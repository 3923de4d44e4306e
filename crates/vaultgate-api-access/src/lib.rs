//! HTTP surface for the vaultgate authorization engine.
//!
//! Maps the three logical operations (reconcile-permissions,
//! check-access, fetch-history) onto axum routes, translating the
//! engine's error taxonomy into RFC 7807 problem-details responses.
//! Requester identity arrives as an explicit field on each request;
//! authenticating it is upstream's concern.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

pub use error::{ApiAccessError, ApiResult};
pub use router::{access_router, AccessState};
