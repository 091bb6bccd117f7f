//! Access decisions for authenticated requests
//!
//! Both gates ask the user directory on every call, so a role or permission
//! revoked in the directory takes effect on the very next request, whatever
//! the token says.

use std::collections::BTreeSet;

use crate::auth::identity::Identity;
use crate::error::{AuthError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::traits::UserDirectory;

/// Allows identities holding at least one of the accepted roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGate {
    accepted: BTreeSet<String>,
}

impl RoleGate {
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub async fn check(&self, identity: &Identity, directory: &dyn UserDirectory) -> Result<()> {
        let held = directory.roles_of(identity.subject_id()).await?;

        if self.accepted.iter().any(|role| held.contains(role)) {
            Ok(())
        } else {
            let required: Vec<String> = self.accepted.iter().cloned().collect();
            log_security_event(SecurityEvent::PermissionDenied {
                subject_id: identity.subject_id(),
                requirement: format!("role in [{}]", required.join(", ")),
            });
            Err(AuthError::InsufficientRole { required })
        }
    }
}

/// Allows identities whose roles grant one `(resource, action)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGate {
    resource: String,
    action: String,
}

impl PermissionGate {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub async fn check(&self, identity: &Identity, directory: &dyn UserDirectory) -> Result<()> {
        let granted = directory
            .has_permission(identity.subject_id(), &self.resource, &self.action)
            .await?;

        if granted {
            Ok(())
        } else {
            log_security_event(SecurityEvent::PermissionDenied {
                subject_id: identity.subject_id(),
                requirement: format!("{}:{}", self.resource, self.action),
            });
            Err(AuthError::MissingPermission {
                resource: self.resource.clone(),
                action: self.action.clone(),
            })
        }
    }
}

/// One declared requirement of a protected handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Role(RoleGate),
    Permission(PermissionGate),
}

impl Guard {
    pub async fn check(&self, identity: &Identity, directory: &dyn UserDirectory) -> Result<()> {
        match self {
            Guard::Role(gate) => gate.check(identity, directory).await,
            Guard::Permission(gate) => gate.check(identity, directory).await,
        }
    }
}

impl From<RoleGate> for Guard {
    fn from(gate: RoleGate) -> Self {
        Guard::Role(gate)
    }
}

impl From<PermissionGate> for Guard {
    fn from(gate: PermissionGate) -> Self {
        Guard::Permission(gate)
    }
}

/// Ordered list of guards; all must pass, evaluation stops at the first denial
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guards {
    guards: Vec<Guard>,
}

impl Guards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, guard: impl Into<Guard>) -> Self {
        self.guards.push(guard.into());
        self
    }

    pub fn require_role<I, S>(self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require(RoleGate::any_of(roles))
    }

    pub fn require_permission(self, resource: &str, action: &str) -> Self {
        self.require(PermissionGate::new(resource, action))
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Run every guard in declaration order against `identity`.
    ///
    /// Without an identity the decision is `NotAuthenticated`, even when no
    /// guard is declared. Directory failures are returned as-is, never as allow.
    pub async fn authorize(
        &self,
        identity: Option<&Identity>,
        directory: &dyn UserDirectory,
    ) -> Result<()> {
        let identity = identity.ok_or(AuthError::NotAuthenticated)?;

        for guard in &self.guards {
            if let Err(e) = guard.check(identity, directory).await {
                if let AuthError::DirectoryUnavailable(msg) = &e {
                    log_security_event(SecurityEvent::DirectoryFailure {
                        operation: "authorize".to_string(),
                        error: msg.clone(),
                    });
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
