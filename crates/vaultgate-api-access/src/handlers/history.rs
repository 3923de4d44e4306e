//! Handler for the fetch-history operation.

use axum::{
    extract::{Query, State},
    Json,
};
use vaultgate_core::UserId;

use crate::error::ApiResult;
use crate::models::{HistoryQuery, LogEntryResponse};
use crate::router::AccessState;

/// Fetch authorization log entries, newest first.
///
/// Users may always read their own history; any other history,
/// including the all-users feed, requires a privileged role. The
/// result is bounded by `limit`, falling back to the server default
/// when absent or non-positive.
#[utoipa::path(
    get,
    path = "/access/history",
    tag = "Access",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Log entries", body = [LogEntryResponse]),
        (status = 400, description = "Missing requester id"),
        (status = 403, description = "Not allowed to view this history"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn fetch_history(
    State(state): State<AccessState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<LogEntryResponse>>> {
    let entries = state
        .history
        .fetch(
            UserId::from_uuid(query.requester_id),
            query.user_id.map(UserId::from_uuid),
            query.limit,
        )
        .await?;

    Ok(Json(entries.into_iter().map(LogEntryResponse::from).collect()))
}
