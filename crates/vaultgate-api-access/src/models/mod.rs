//! Request and response models.

pub mod requests;
pub mod responses;

pub use requests::{CheckAccessRequest, HistoryQuery, ReconcilePermissionsRequest};
pub use responses::{CheckAccessResponse, LogEntryResponse, ReconcileResponse};
