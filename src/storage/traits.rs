//! Abstract interfaces to the user directory
//!
//! `UserDirectory` is everything authentication and authorization ask of the
//! directory. `UserRegistry` covers the account-management operations used by
//! registration and the user administration routes.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::auth::user::{Credential, User, UserWithRoles};
use crate::error::Result;

/// Read-side queries issued by login and the access guards
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Subject id and password digest for an email, if registered
    async fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>>;

    /// Names of the roles currently held by a subject
    async fn roles_of(&self, subject_id: i64) -> Result<HashSet<String>>;

    /// Whether any role held by the subject grants `(resource, action)`
    async fn has_permission(&self, subject_id: i64, resource: &str, action: &str) -> Result<bool>;
}

/// Account management
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Create an account. Fails with `EmailTaken` if the email is registered.
    async fn create_user(&self, email: &str, password_digest: String) -> Result<User>;

    /// Associate a role with a user; assigning a held role is a no-op
    async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<()>;

    /// Same as `assign_role`, addressing the role by name
    async fn assign_role_by_name(&self, user_id: i64, role_name: &str) -> Result<()>;

    /// Drop a role association; removing an absent one is a no-op
    async fn remove_role(&self, user_id: i64, role_id: i64) -> Result<()>;

    async fn get_user(&self, user_id: i64) -> Result<Option<UserWithRoles>>;

    /// All users, newest first
    async fn list_users(&self) -> Result<Vec<UserWithRoles>>;
}
