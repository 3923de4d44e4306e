//! End-to-end tests for the access API over the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use vaultgate_api_access::{access_router, AccessState};
use vaultgate_authorization::{
    InMemoryPermissionStore, PermissionStore, PrivilegedRoles,
};
use vaultgate_core::{PermissionId, UserId};

fn app(store: Arc<InMemoryPermissionStore>) -> Router {
    let state = AccessState::new(store, PrivilegedRoles::default());
    access_router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_check_access_grants_held_permission() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let user = UserId::new();
    let permission = PermissionId::new();
    store.add_user(user).await;
    store.seed_permission(user, permission).await;

    let response = app(store.clone())
        .oneshot(post_json(
            "/access/check",
            json!({
                "user_id": user.as_uuid(),
                "permission_id": permission.as_uuid(),
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["authorized"], json!(true));

    let entries = store.logged_entries().await;
    assert_eq!(entries.len(), 1);
    assert!(entries[0].success);
}

#[tokio::test]
async fn test_check_access_denies_unknown_subject_with_200() {
    let store = Arc::new(InMemoryPermissionStore::new());

    let response = app(store.clone())
        .oneshot(post_json(
            "/access/check",
            json!({
                "user_id": Uuid::new_v4(),
                "permission_id": Uuid::new_v4(),
            }),
        ))
        .await
        .unwrap();

    // Denial is a decision, not an error.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["authorized"], json!(false));

    let entries = store.logged_entries().await;
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
}

#[tokio::test]
async fn test_admin_reconciles_another_users_permissions() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let admin = UserId::new();
    let target = UserId::new();
    let kept = PermissionId::new();
    let dropped = PermissionId::new();
    let added = PermissionId::new();
    store.add_user_with_role(admin, "admin").await;
    store.add_user(target).await;
    store.seed_permission(target, kept).await;
    store.seed_permission(target, dropped).await;

    let response = app(store.clone())
        .oneshot(post_json(
            "/access/reconcile",
            json!({
                "requester_id": admin.as_uuid(),
                "target_user_id": target.as_uuid(),
                "permissions": [kept.as_uuid(), added.as_uuid()],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["target_user_id"], json!(target.as_uuid()));
    assert_eq!(body["granted"], json!([added.as_uuid()]));
    assert_eq!(body["revoked"], json!([dropped.as_uuid()]));

    let resulting = store.fetch_permissions(target).await.unwrap();
    assert_eq!(resulting, [kept, added].into_iter().collect());
}

#[tokio::test]
async fn test_non_admin_reconciliation_is_forbidden_and_inert() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let requester = UserId::new();
    let target = UserId::new();
    let held = PermissionId::new();
    store.add_user_with_role(requester, "member").await;
    store.add_user(target).await;
    store.seed_permission(target, held).await;

    let response = app(store.clone())
        .oneshot(post_json(
            "/access/reconcile",
            json!({
                "requester_id": requester.as_uuid(),
                "target_user_id": target.as_uuid(),
                "permissions": [],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(
        body["type"],
        json!("https://vaultgate.dev/problems/insufficient-role")
    );

    let untouched = store.fetch_permissions(target).await.unwrap();
    assert!(untouched.contains(&held));
}

#[tokio::test]
async fn test_self_reconciliation_is_forbidden_even_for_admins() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let admin = UserId::new();
    store.add_user_with_role(admin, "admin").await;

    let response = app(store)
        .oneshot(post_json(
            "/access/reconcile",
            json!({
                "requester_id": admin.as_uuid(),
                "target_user_id": admin.as_uuid(),
                "permissions": [Uuid::new_v4()],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(
        body["type"],
        json!("https://vaultgate.dev/problems/self-modification-denied")
    );
}

#[tokio::test]
async fn test_missing_target_maps_to_404() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let admin = UserId::new();
    store.add_user_with_role(admin, "admin").await;

    let response = app(store)
        .oneshot(post_json(
            "/access/reconcile",
            json!({
                "requester_id": admin.as_uuid(),
                "target_user_id": Uuid::new_v4(),
                "permissions": [],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_self_view_is_bounded_by_default_limit() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let user = UserId::new();
    store.add_user(user).await;

    // Generate 12 decision evaluations, each of which appends one entry.
    let router = app(store.clone());
    for _ in 0..12 {
        router
            .clone()
            .oneshot(post_json(
                "/access/check",
                json!({
                    "user_id": user.as_uuid(),
                    "permission_id": Uuid::new_v4(),
                }),
            ))
            .await
            .unwrap();
    }

    let response = router
        .oneshot(get(&format!(
            "/access/history?requester_id={}&user_id={}",
            user, user
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_history_foreign_view_is_forbidden() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let user = UserId::new();
    let other = UserId::new();
    store.add_user(user).await;
    store.add_user(other).await;

    let response = app(store)
        .oneshot(get(&format!(
            "/access/history?requester_id={}&user_id={}",
            user, other
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["type"], json!("https://vaultgate.dev/problems/forbidden"));
}

#[tokio::test]
async fn test_history_all_users_requires_privilege() {
    let store = Arc::new(InMemoryPermissionStore::new());
    let admin = UserId::new();
    let user = UserId::new();
    store.add_user_with_role(admin, "admin").await;
    store.add_user(user).await;

    let router = app(store);

    let allowed = router
        .clone()
        .oneshot(get(&format!("/access/history?requester_id={admin}")))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);

    let denied = router
        .oneshot(get(&format!("/access/history?requester_id={user}")))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}
