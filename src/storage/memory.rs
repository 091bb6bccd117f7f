//! In-memory user directory for development and testing
//!
//! Keeps users, roles, permissions and their associations in process memory.
//! Seeded with an `admin` role (granted `users:read` and `users:write`) and a
//! `user` role with no permissions.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{UserDirectory, UserRegistry};
use crate::auth::user::{Credential, Permission, Role, User, UserWithRoles};
use crate::constants::{ADMIN_ROLE, DEFAULT_ROLE};
use crate::error::{AuthError, Result};

struct StoredUser {
    user: User,
    password_digest: String,
}

#[derive(Default)]
struct DirectoryState {
    users: BTreeMap<i64, StoredUser>,
    emails: HashMap<String, i64>,
    roles: BTreeMap<i64, Role>,
    permissions: BTreeMap<i64, Permission>,
    user_roles: HashMap<i64, BTreeSet<i64>>,     // user_id -> role_ids
    role_permissions: HashMap<i64, BTreeSet<i64>>, // role_id -> permission_ids
    next_user_id: i64,
    next_role_id: i64,
    next_permission_id: i64,
}

impl DirectoryState {
    fn seeded() -> Self {
        let mut state = Self {
            next_user_id: 1,
            next_role_id: 1,
            next_permission_id: 1,
            ..Self::default()
        };

        let admin = state.define_role(ADMIN_ROLE, "Full access to user administration");
        state.define_role(DEFAULT_ROLE, "Regular account");
        let read = state.define_permission("users:read", "users", "read");
        let write = state.define_permission("users:write", "users", "write");
        state.grant(admin, read);
        state.grant(admin, write);
        state
    }

    fn define_role(&mut self, name: &str, description: &str) -> i64 {
        if let Some(role) = self.roles.values().find(|r| r.name == name) {
            return role.id;
        }
        let id = self.next_role_id;
        self.next_role_id += 1;
        self.roles.insert(
            id,
            Role {
                id,
                name: name.to_string(),
                description: description.to_string(),
            },
        );
        id
    }

    fn define_permission(&mut self, name: &str, resource: &str, action: &str) -> i64 {
        if let Some(perm) = self.permissions.values().find(|p| p.matches(resource, action)) {
            return perm.id;
        }
        let id = self.next_permission_id;
        self.next_permission_id += 1;
        self.permissions.insert(
            id,
            Permission {
                id,
                name: name.to_string(),
                resource: resource.to_string(),
                action: action.to_string(),
            },
        );
        id
    }

    fn grant(&mut self, role_id: i64, permission_id: i64) {
        self.role_permissions
            .entry(role_id)
            .or_insert_with(BTreeSet::new)
            .insert(permission_id);
    }

    fn role_ids_of(&self, user_id: i64) -> impl Iterator<Item = i64> + '_ {
        self.user_roles
            .get(&user_id)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    fn with_roles(&self, stored: &StoredUser) -> UserWithRoles {
        let roles: Vec<Role> = self
            .role_ids_of(stored.user.id)
            .filter_map(|id| self.roles.get(&id).cloned())
            .collect();

        let permission_ids: BTreeSet<i64> = roles
            .iter()
            .filter_map(|role| self.role_permissions.get(&role.id))
            .flat_map(|ids| ids.iter().copied())
            .collect();

        UserWithRoles {
            user: stored.user.clone(),
            roles,
            permissions: permission_ids
                .into_iter()
                .filter_map(|id| self.permissions.get(&id).cloned())
                .collect(),
        }
    }
}

/// In-memory implementation of [`UserDirectory`] and [`UserRegistry`]
pub struct MemoryUserDirectory {
    state: Arc<RwLock<DirectoryState>>,
    available: AtomicBool,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(DirectoryState::seeded())),
            available: AtomicBool::new(true),
        }
    }

    /// Create a role, or return the id of the existing role with that name
    pub async fn define_role(&self, name: &str, description: &str) -> i64 {
        self.state.write().await.define_role(name, description)
    }

    /// Create a permission, or return the id of the existing one for `(resource, action)`
    pub async fn define_permission(&self, resource: &str, action: &str) -> i64 {
        let name = format!("{}:{}", resource, action);
        self.state.write().await.define_permission(&name, resource, action)
    }

    pub async fn grant_permission(&self, role_id: i64, permission_id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AuthError::NotFound("Role not found".to_string()));
        }
        if !state.permissions.contains_key(&permission_id) {
            return Err(AuthError::NotFound("Permission not found".to_string()));
        }
        state.grant(role_id, permission_id);
        Ok(())
    }

    pub async fn revoke_permission(&self, role_id: i64, permission_id: i64) {
        if let Some(ids) = self.state.write().await.role_permissions.get_mut(&role_id) {
            ids.remove(&permission_id);
        }
    }

    pub async fn role_id(&self, name: &str) -> Option<i64> {
        self.state
            .read()
            .await
            .roles
            .values()
            .find(|r| r.name == name)
            .map(|r| r.id)
    }

    /// Simulate the directory going down (or coming back). While unavailable,
    /// every query fails with `DirectoryUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AuthError::DirectoryUnavailable("directory is offline".to_string()))
        }
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>> {
        self.ensure_available()?;
        let state = self.state.read().await;

        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .map(|stored| Credential {
                subject_id: stored.user.id,
                password_digest: stored.password_digest.clone(),
            }))
    }

    async fn roles_of(&self, subject_id: i64) -> Result<HashSet<String>> {
        self.ensure_available()?;
        let state = self.state.read().await;

        Ok(state
            .role_ids_of(subject_id)
            .filter_map(|id| state.roles.get(&id))
            .map(|role| role.name.clone())
            .collect())
    }

    async fn has_permission(&self, subject_id: i64, resource: &str, action: &str) -> Result<bool> {
        self.ensure_available()?;
        let state = self.state.read().await;

        let granted = state
            .role_ids_of(subject_id)
            .filter_map(|role_id| state.role_permissions.get(&role_id))
            .flat_map(|ids| ids.iter())
            .filter_map(|id| state.permissions.get(id))
            .any(|perm| perm.matches(resource, action));
        Ok(granted)
    }
}

#[async_trait]
impl UserRegistry for MemoryUserDirectory {
    async fn create_user(&self, email: &str, password_digest: String) -> Result<User> {
        self.ensure_available()?;
        let mut state = self.state.write().await;

        if state.emails.contains_key(email) {
            return Err(AuthError::EmailTaken);
        }

        let id = state.next_user_id;
        state.next_user_id += 1;

        let user = User::new(id, email.to_string());
        state.emails.insert(email.to_string(), id);
        state.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_digest,
            },
        );
        Ok(user)
    }

    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<()> {
        self.ensure_available()?;
        let mut state = self.state.write().await;

        if !state.roles.contains_key(&role_id) {
            return Err(AuthError::NotFound("Role not found".to_string()));
        }
        let stored = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AuthError::NotFound("User not found".to_string()))?;
        stored.user.touch();

        state
            .user_roles
            .entry(user_id)
            .or_insert_with(BTreeSet::new)
            .insert(role_id);
        Ok(())
    }

    async fn assign_role_by_name(&self, user_id: i64, role_name: &str) -> Result<()> {
        let role_id = self
            .role_id(role_name)
            .await
            .ok_or_else(|| AuthError::NotFound(format!("Role '{}' not found", role_name)))?;
        self.assign_role(user_id, role_id).await
    }

    async fn remove_role(&self, user_id: i64, role_id: i64) -> Result<()> {
        self.ensure_available()?;
        let mut state = self.state.write().await;

        let removed = state
            .user_roles
            .get_mut(&user_id)
            .map(|ids| ids.remove(&role_id))
            .unwrap_or(false);
        if removed {
            if let Some(stored) = state.users.get_mut(&user_id) {
                stored.user.touch();
            }
        }
        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<UserWithRoles>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state.users.get(&user_id).map(|stored| state.with_roles(stored)))
    }

    async fn list_users(&self) -> Result<Vec<UserWithRoles>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .rev()
            .map(|stored| state.with_roles(stored))
            .collect())
    }
}
