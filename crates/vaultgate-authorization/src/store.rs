//! Store access abstraction.
//!
//! Every engine component reaches storage through [`PermissionStore`], an
//! injected trait object. The Postgres implementation delegates to the
//! `vaultgate-db` entity models; the in-memory implementation backs the
//! unit tests and supports failure injection so fail-closed and
//! partial-apply behavior can be exercised without a database.

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use vaultgate_core::{PermissionId, UserId};
use vaultgate_db::models::{AuthorizationLog, NewAuthorizationLog, Role, User, UserPermission};

use crate::error::{AuthorizationError, Result};

/// Read and mutate role membership, permission assignments, and the
/// authorization log.
///
/// Role membership and permission definitions are read-only through this
/// interface; only assignments and log entries are ever written.
#[async_trait::async_trait]
pub trait PermissionStore: Send + Sync {
    /// Names of all roles held by a user. Unknown users hold no roles.
    async fn fetch_roles(&self, user_id: UserId) -> Result<Vec<String>>;

    /// The user's current permission assignment set.
    async fn fetch_permissions(&self, user_id: UserId) -> Result<HashSet<PermissionId>>;

    /// Grant a permission to a user. Idempotent.
    async fn grant_permission(&self, user_id: UserId, permission_id: PermissionId) -> Result<()>;

    /// Revoke a permission from a user.
    async fn revoke_permission(&self, user_id: UserId, permission_id: PermissionId) -> Result<()>;

    /// Whether a user with this id exists.
    async fn user_exists(&self, user_id: UserId) -> Result<bool>;

    /// Append an authorization log entry.
    async fn append_log(&self, entry: NewAuthorizationLog) -> Result<AuthorizationLog>;

    /// List log entries, newest first, for one user or for all users,
    /// bounded by `limit`.
    async fn fetch_logs(
        &self,
        user_id: Option<UserId>,
        limit: i64,
    ) -> Result<Vec<AuthorizationLog>>;
}

/// Postgres-backed store over a shared connection pool.
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PermissionStore for PgPermissionStore {
    async fn fetch_roles(&self, user_id: UserId) -> Result<Vec<String>> {
        Ok(Role::names_for_user(&self.pool, *user_id.as_uuid()).await?)
    }

    async fn fetch_permissions(&self, user_id: UserId) -> Result<HashSet<PermissionId>> {
        let ids = UserPermission::permission_ids_for_user(&self.pool, *user_id.as_uuid()).await?;
        Ok(ids.into_iter().map(PermissionId::from_uuid).collect())
    }

    async fn grant_permission(&self, user_id: UserId, permission_id: PermissionId) -> Result<()> {
        UserPermission::grant(&self.pool, *user_id.as_uuid(), *permission_id.as_uuid()).await?;
        Ok(())
    }

    async fn revoke_permission(&self, user_id: UserId, permission_id: PermissionId) -> Result<()> {
        UserPermission::revoke(&self.pool, *user_id.as_uuid(), *permission_id.as_uuid()).await?;
        Ok(())
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool> {
        Ok(User::exists(&self.pool, *user_id.as_uuid()).await?)
    }

    async fn append_log(&self, entry: NewAuthorizationLog) -> Result<AuthorizationLog> {
        Ok(AuthorizationLog::append(&self.pool, entry).await?)
    }

    async fn fetch_logs(
        &self,
        user_id: Option<UserId>,
        limit: i64,
    ) -> Result<Vec<AuthorizationLog>> {
        let user_id = user_id.map(|id| *id.as_uuid());
        Ok(AuthorizationLog::list(&self.pool, user_id, limit).await?)
    }
}

#[derive(Default)]
struct InMemoryState {
    users: HashSet<UserId>,
    roles: HashMap<UserId, Vec<String>>,
    permissions: HashMap<UserId, HashSet<PermissionId>>,
    logs: Vec<AuthorizationLog>,
    failing_grants: HashSet<PermissionId>,
    fail_permission_reads: bool,
    fail_log_appends: bool,
}

fn store_unavailable() -> AuthorizationError {
    AuthorizationError::Store(sqlx::Error::PoolClosed)
}

/// In-memory store for testing.
///
/// The failure-injection knobs simulate an unavailable backend for
/// specific operations.
#[derive(Default)]
pub struct InMemoryPermissionStore {
    state: RwLock<InMemoryState>,
}

impl InMemoryPermissionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user.
    pub async fn add_user(&self, user_id: UserId) {
        self.state.write().await.users.insert(user_id);
    }

    /// Register a user holding the given role.
    pub async fn add_user_with_role(&self, user_id: UserId, role: &str) {
        let mut state = self.state.write().await;
        state.users.insert(user_id);
        state
            .roles
            .entry(user_id)
            .or_default()
            .push(role.to_string());
    }

    /// Seed a permission assignment directly, bypassing reconciliation.
    pub async fn seed_permission(&self, user_id: UserId, permission_id: PermissionId) {
        self.state
            .write()
            .await
            .permissions
            .entry(user_id)
            .or_default()
            .insert(permission_id);
    }

    /// Make every future grant of this permission fail.
    pub async fn fail_grant_of(&self, permission_id: PermissionId) {
        self.state.write().await.failing_grants.insert(permission_id);
    }

    /// Make permission-set reads fail.
    pub async fn fail_permission_reads(&self, fail: bool) {
        self.state.write().await.fail_permission_reads = fail;
    }

    /// Make log appends fail.
    pub async fn fail_log_appends(&self, fail: bool) {
        self.state.write().await.fail_log_appends = fail;
    }

    /// Snapshot of all recorded log entries, in append order.
    pub async fn logged_entries(&self) -> Vec<AuthorizationLog> {
        self.state.read().await.logs.clone()
    }
}

#[async_trait::async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn fetch_roles(&self, user_id: UserId) -> Result<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.roles.get(&user_id).cloned().unwrap_or_default())
    }

    async fn fetch_permissions(&self, user_id: UserId) -> Result<HashSet<PermissionId>> {
        let state = self.state.read().await;
        if state.fail_permission_reads {
            return Err(store_unavailable());
        }
        Ok(state.permissions.get(&user_id).cloned().unwrap_or_default())
    }

    async fn grant_permission(&self, user_id: UserId, permission_id: PermissionId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.failing_grants.contains(&permission_id) {
            return Err(store_unavailable());
        }
        state
            .permissions
            .entry(user_id)
            .or_default()
            .insert(permission_id);
        Ok(())
    }

    async fn revoke_permission(&self, user_id: UserId, permission_id: PermissionId) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(set) = state.permissions.get_mut(&user_id) {
            set.remove(&permission_id);
        }
        Ok(())
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool> {
        Ok(self.state.read().await.users.contains(&user_id))
    }

    async fn append_log(&self, entry: NewAuthorizationLog) -> Result<AuthorizationLog> {
        let mut state = self.state.write().await;
        if state.fail_log_appends {
            return Err(store_unavailable());
        }
        let record = AuthorizationLog {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            permission_id: entry.permission_id,
            success: entry.success,
            created_at: chrono::Utc::now(),
        };
        state.logs.push(record.clone());
        Ok(record)
    }

    async fn fetch_logs(
        &self,
        user_id: Option<UserId>,
        limit: i64,
    ) -> Result<Vec<AuthorizationLog>> {
        let state = self.state.read().await;
        let mut entries: Vec<AuthorizationLog> = state
            .logs
            .iter()
            .filter(|e| user_id.is_none_or(|id| e.user_id == *id.as_uuid()))
            .cloned()
            .collect();

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(entries)
    }
}
