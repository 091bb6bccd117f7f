//! Bearer-token authentication of a single request
//!
//! Resolution runs `header -> token -> verify` and ends either with an
//! [`Identity`] or with the reason the request was rejected. It only ever talks
//! to the [`TokenService`]; the user directory is not consulted.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::token::{Claims, TokenService};
use crate::error::{AuthError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};

/// Authenticated identity, passed to guards and handlers alongside the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Identity {
    claims: Claims,
}

impl Identity {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn subject_id(&self) -> i64 {
        self.claims.subject_id
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Turns an `Authorization` header value into an [`Identity`]
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: Arc<TokenService>,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Authenticate a request given its raw `Authorization` header, if any.
    ///
    /// Absent header, wrong scheme and empty token all yield `MissingToken`.
    /// Verification failures keep their kind (expired, malformed, bad signature).
    pub fn resolve(&self, authorization: Option<&str>) -> Result<Identity> {
        let token = match authorization.and_then(extract_bearer_token) {
            Some(token) => token,
            None => {
                log::debug!("Request rejected: no bearer token");
                return Err(AuthError::MissingToken);
            }
        };

        match self.tokens.verify(token) {
            Ok(claims) => {
                log::debug!("Request authenticated as subject {}", claims.subject_id);
                Ok(Identity::new(claims))
            }
            Err(e) => {
                log_security_event(SecurityEvent::TokenValidationFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
