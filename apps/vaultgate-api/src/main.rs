//! Vaultgate access API server.
//!
//! Wires the authorization engine over a Postgres-backed store and
//! serves the access routes plus health and `OpenAPI` endpoints.

mod config;
mod openapi;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::signal;
use tracing_subscriber::EnvFilter;

use config::Config;
use vaultgate_api_access::{access_router, AccessState};
use vaultgate_authorization::{PgPermissionStore, PrivilegedRoles};
use vaultgate_db::{run_migrations, DbPool};

async fn healthz() -> &'static str {
    "OK"
}

/// Resolves when ctrl-c or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    EnvFilter::new("info,vaultgate_api=debug,vaultgate_authorization=debug")
                }),
        )
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    tracing::info!(
        listen_addr = %config.listen_addr,
        reconcile_roles = ?config.reconcile_roles,
        history_roles = ?config.history_roles,
        "starting vaultgate access API"
    );

    let pool = DbPool::connect(&config.database_url)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Database connection error: {e}");
            std::process::exit(1);
        });

    run_migrations(&pool).await.unwrap_or_else(|e| {
        eprintln!("Migration error: {e}");
        std::process::exit(1);
    });

    let store = Arc::new(PgPermissionStore::new(pool.inner().clone()));
    let privileged = PrivilegedRoles::new(
        config.reconcile_roles.clone(),
        config.history_roles.clone(),
    );
    let state = AccessState::new(store, privileged);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(access_router(state));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Bind error: {e}");
            std::process::exit(1);
        });

    tracing::info!(listen_addr = %config.listen_addr, "vaultgate access API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        });
}
