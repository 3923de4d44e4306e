//! Handler for the check-access operation.

use axum::{extract::State, Json};
use vaultgate_core::{PermissionId, UserId};

use crate::error::ApiResult;
use crate::models::{CheckAccessRequest, CheckAccessResponse};
use crate::router::AccessState;

/// Check whether a user currently holds a permission.
///
/// Fail-closed: missing users, empty assignment sets, and store
/// failures all answer `authorized: false`. Every evaluation is
/// recorded in the authorization log.
#[utoipa::path(
    post,
    path = "/access/check",
    tag = "Access",
    request_body = CheckAccessRequest,
    responses(
        (status = 200, description = "Access decision", body = CheckAccessResponse)
    )
)]
pub async fn check_access(
    State(state): State<AccessState>,
    Json(request): Json<CheckAccessRequest>,
) -> ApiResult<Json<CheckAccessResponse>> {
    let decision = state
        .decisions
        .decide(
            UserId::from_uuid(request.user_id),
            PermissionId::from_uuid(request.permission_id),
        )
        .await;

    Ok(Json(CheckAccessResponse::from(decision)))
}
