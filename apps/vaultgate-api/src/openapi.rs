//! `OpenAPI` document for the access API.

use axum::Json;
use utoipa::OpenApi;

/// `OpenAPI` documentation for the vaultgate access API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vaultgate API",
        version = "0.1.0",
        description = "Permission reconciliation and authorization gate"
    ),
    paths(
        vaultgate_api_access::handlers::reconcile::reconcile_permissions,
        vaultgate_api_access::handlers::check::check_access,
        vaultgate_api_access::handlers::history::fetch_history,
    ),
    tags(
        (name = "Access", description = "Permission checks, reconciliation, and history")
    )
)]
pub struct ApiDoc;

/// Serve the generated document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/access/reconcile"));
        assert!(paths.contains_key("/access/check"));
        assert!(paths.contains_key("/access/history"));
    }
}
