//! Error types for the access API.
//!
//! Every engine error maps to a distinct RFC 7807 problem type so
//! callers can always tell an authorization denial from an
//! infrastructure failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use vaultgate_authorization::{AuthorizationError, PartialApplyReport};

/// Outcome of a single permission mutation, reported on partial apply
/// failures.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MutationOutcome {
    /// "grant" or "revoke".
    pub kind: String,
    /// The affected permission.
    pub permission_id: Uuid,
    /// Failure description, absent for applied mutations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error type for the access API.
#[derive(Debug, thiserror::Error)]
pub enum ApiAccessError {
    /// Missing or malformed request field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requester targeted their own permission set.
    #[error("Requesters may not modify their own permissions")]
    SelfModificationDenied,

    /// Requester lacks an entitled role.
    #[error("Privileged role required")]
    InsufficientRole,

    /// Reconciliation target does not exist.
    #[error("Target user not found")]
    TargetNotFound(Uuid),

    /// History access denied.
    #[error("Forbidden")]
    Forbidden,

    /// Backend unavailable or query failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Some but not all permission mutations were applied.
    #[error("Partial apply failure")]
    PartialApply(PartialApplyReport),
}

impl From<AuthorizationError> for ApiAccessError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::InvalidRequest(msg) => Self::Validation(msg),
            AuthorizationError::SelfModificationDenied => Self::SelfModificationDenied,
            AuthorizationError::InsufficientRole => Self::InsufficientRole,
            AuthorizationError::TargetNotFound(id) => Self::TargetNotFound(*id.as_uuid()),
            AuthorizationError::Forbidden => Self::Forbidden,
            AuthorizationError::Store(e) => Self::Store(e.to_string()),
            AuthorizationError::PartialApply(report) => Self::PartialApply(report),
        }
    }
}

/// Convenience Result type for handlers.
pub type ApiResult<T> = Result<T, ApiAccessError>;

/// RFC 7807 Problem Details response format.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Mutations that were applied (partial apply failures only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<Vec<MutationOutcome>>,
    /// Mutations that failed (partial apply failures only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<MutationOutcome>>,
}

impl ProblemDetails {
    fn new(problem_type: &str, title: &str, status: StatusCode, detail: String) -> Self {
        Self {
            problem_type: format!("https://vaultgate.dev/problems/{problem_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: Some(detail),
            applied: None,
            failed: None,
        }
    }
}

impl IntoResponse for ApiAccessError {
    fn into_response(self) -> Response {
        let (status, problem) = match &self {
            ApiAccessError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ProblemDetails::new(
                    "validation-error",
                    "Validation Error",
                    StatusCode::BAD_REQUEST,
                    msg.clone(),
                ),
            ),
            ApiAccessError::SelfModificationDenied => (
                StatusCode::FORBIDDEN,
                ProblemDetails::new(
                    "self-modification-denied",
                    "Self-Modification Denied",
                    StatusCode::FORBIDDEN,
                    "Requesters may not modify their own permissions".to_string(),
                ),
            ),
            ApiAccessError::InsufficientRole => (
                StatusCode::FORBIDDEN,
                ProblemDetails::new(
                    "insufficient-role",
                    "Insufficient Role",
                    StatusCode::FORBIDDEN,
                    "A privileged role is required for this operation".to_string(),
                ),
            ),
            ApiAccessError::TargetNotFound(id) => (
                StatusCode::NOT_FOUND,
                ProblemDetails::new(
                    "target-not-found",
                    "Target Not Found",
                    StatusCode::NOT_FOUND,
                    format!("No user found with id {id}"),
                ),
            ),
            ApiAccessError::Forbidden => (
                StatusCode::FORBIDDEN,
                ProblemDetails::new(
                    "forbidden",
                    "Forbidden",
                    StatusCode::FORBIDDEN,
                    "You are not allowed to view this history".to_string(),
                ),
            ),
            ApiAccessError::Store(msg) => {
                tracing::error!(error = %msg, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(
                        "store-error",
                        "Store Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "A storage error occurred".to_string(),
                    ),
                )
            }
            ApiAccessError::PartialApply(report) => {
                tracing::error!(
                    target_user_id = %report.target_user_id,
                    applied = report.applied.len(),
                    failed = report.failed.len(),
                    "Partial apply failure"
                );
                let mut problem = ProblemDetails::new(
                    "partial-apply-failure",
                    "Partial Apply Failure",
                    StatusCode::INTERNAL_SERVER_ERROR,
                    report.to_string(),
                );
                problem.applied = Some(
                    report
                        .applied
                        .iter()
                        .map(|m| MutationOutcome {
                            kind: m.kind.to_string(),
                            permission_id: *m.permission_id.as_uuid(),
                            error: None,
                        })
                        .collect(),
                );
                problem.failed = Some(
                    report
                        .failed
                        .iter()
                        .map(|m| MutationOutcome {
                            kind: m.kind.to_string(),
                            permission_id: *m.permission_id.as_uuid(),
                            error: Some(m.error.clone()),
                        })
                        .collect(),
                );
                (StatusCode::INTERNAL_SERVER_ERROR, problem)
            }
        };

        (status, Json(problem)).into_response()
    }
}
