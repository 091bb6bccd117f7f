use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account, as exposed to clients (never carries the password digest)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: i64,
    /// Login email
    pub email: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: i64, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Named group of permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Grant of one action on one resource, e.g. `users:read`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub resource: String,
    pub action: String,
}

impl Permission {
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }
}

/// What login needs from the directory
#[derive(Debug, Clone)]
pub struct Credential {
    pub subject_id: i64,
    pub password_digest: String,
}

/// A user with its roles and the permissions those roles grant
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}
