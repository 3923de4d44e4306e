//! Handler for the reconcile-permissions operation.

use std::collections::HashSet;

use axum::{extract::State, Json};
use vaultgate_core::{PermissionId, UserId};

use crate::error::ApiResult;
use crate::models::{ReconcilePermissionsRequest, ReconcileResponse};
use crate::router::AccessState;

/// Bring a user's permission set to exactly match the requested set.
///
/// Requires the requester to hold a privileged role; requesters can
/// never reconcile their own set.
#[utoipa::path(
    post,
    path = "/access/reconcile",
    tag = "Access",
    request_body = ReconcilePermissionsRequest,
    responses(
        (status = 200, description = "Permission set reconciled", body = ReconcileResponse),
        (status = 400, description = "Missing or malformed request field"),
        (status = 403, description = "Self-modification or insufficient role"),
        (status = 404, description = "Target user not found"),
        (status = 500, description = "Store failure or partially applied mutations")
    )
)]
pub async fn reconcile_permissions(
    State(state): State<AccessState>,
    Json(request): Json<ReconcilePermissionsRequest>,
) -> ApiResult<Json<ReconcileResponse>> {
    let desired: HashSet<PermissionId> = request
        .permissions
        .iter()
        .map(|id| PermissionId::from_uuid(*id))
        .collect();

    let report = state
        .reconciliation
        .reconcile(
            UserId::from_uuid(request.requester_id),
            UserId::from_uuid(request.target_user_id),
            desired,
        )
        .await?;

    Ok(Json(ReconcileResponse::from(report)))
}
