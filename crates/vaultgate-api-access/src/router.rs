//! Router configuration for the access API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use vaultgate_authorization::{
    AccessDecisionEngine, AuditLogger, AuthorizationGate, HistoryService, PermissionStore,
    PrivilegedRoles, ReconciliationService,
};

use crate::handlers;

/// Shared state for all access API handlers.
#[derive(Clone)]
pub struct AccessState {
    /// Reconciliation orchestration.
    pub reconciliation: Arc<ReconciliationService>,

    /// Fail-closed access checks.
    pub decisions: Arc<AccessDecisionEngine>,

    /// Gated history retrieval.
    pub history: Arc<HistoryService>,
}

impl AccessState {
    /// Wire the engine components over one injected store.
    #[must_use]
    pub fn new(store: Arc<dyn PermissionStore>, privileged: PrivilegedRoles) -> Self {
        let reconcile_gate = AuthorizationGate::new(Arc::clone(&store), privileged.clone());
        let history_gate = AuthorizationGate::new(Arc::clone(&store), privileged);
        let audit = AuditLogger::new(Arc::clone(&store));

        Self {
            reconciliation: Arc::new(ReconciliationService::new(
                Arc::clone(&store),
                reconcile_gate,
            )),
            decisions: Arc::new(AccessDecisionEngine::new(Arc::clone(&store), audit)),
            history: Arc::new(HistoryService::new(store, history_gate)),
        }
    }
}

/// Create the access router.
///
/// # Routes
///
/// - `POST /access/reconcile` - Reconcile a user's permission set
/// - `POST /access/check`     - Check whether a user holds a permission
/// - `GET  /access/history`   - Fetch authorization log entries
pub fn access_router(state: AccessState) -> Router {
    Router::new()
        .route("/access/reconcile", post(handlers::reconcile_permissions))
        .route("/access/check", post(handlers::check_access))
        .route("/access/history", get(handlers::fetch_history))
        .with_state(state)
}
