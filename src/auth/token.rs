use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::keys::KeyStore;
use crate::error::{AuthError, Result};

/// Identity claims carried by a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(rename = "userId")]
    pub subject_id: i64,
    /// Email the subject registered with
    pub email: String,
    /// Role names, only when the issuer chose to embed them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl Claims {
    pub fn new(subject_id: i64, email: impl Into<String>) -> Self {
        Self {
            subject_id,
            email: email.into(),
            roles: None,
        }
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = Some(roles);
        self
    }
}

/// Wire payload: the identity claims plus the validity window
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    #[serde(flatten)]
    claims: Claims,
    /// Issued at (as UTC timestamp)
    iat: u64,
    /// Expiration time (as UTC timestamp)
    exp: u64,
}

/// Issues and verifies RS256-signed tokens
pub struct TokenService {
    keys: Arc<KeyStore>,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(keys: Arc<KeyStore>, ttl: Duration) -> Self {
        // Only RS256 is accepted; no clock leeway so `exp` is a hard bound
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self { keys, ttl, validation }
    }

    /// Sign `claims` into a token that expires after the configured TTL
    pub fn issue(&self, claims: &Claims) -> Result<String> {
        let signing_key = self
            .keys
            .private_key()
            .map_err(|e| AuthError::SigningUnavailable(e.to_string()))?;

        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let payload = TokenPayload {
            claims: claims.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl.as_secs()),
        };

        encode(&Header::new(Algorithm::RS256), &payload, signing_key)
            .map_err(|e| AuthError::SigningUnavailable(format!("Failed to sign token: {}", e)))
    }

    /// Check signature, algorithm and expiry, then decode the claims.
    ///
    /// There is no revocation list: a correctly signed token stays valid until `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let verifying_key = self.keys.public_key()?;

        decode::<TokenPayload>(token, verifying_key, &self.validation)
            .map(|data| data.claims.claims)
            .map_err(|e| {
                log::debug!("Token verification failed: {}", e);
                AuthError::from(e)
            })
    }
}
