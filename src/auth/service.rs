//! Registration and login
//!
//! The only places tokens are issued. Password hashing runs on the blocking
//! pool so a slow hash never stalls other requests on the same worker.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::credentials::CredentialService;
use crate::auth::token::{Claims, TokenService};
use crate::auth::user::User;
use crate::constants::{DEFAULT_ROLE, MIN_LOGIN_DURATION, MIN_PASSWORD_LENGTH};
use crate::error::{AuthError, Result};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::traits::{UserDirectory, UserRegistry};

/// Token plus the account it was issued for
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub user: User,
}

pub struct AuthService {
    tokens: Arc<TokenService>,
    credentials: CredentialService,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<dyn UserRegistry>,
    // Verified against when the email is unknown, so both paths cost one hash check
    dummy_digest: String,
}

impl AuthService {
    pub fn new(
        tokens: Arc<TokenService>,
        directory: Arc<dyn UserDirectory>,
        registry: Arc<dyn UserRegistry>,
    ) -> Result<Self> {
        let credentials = CredentialService::new()?;
        let dummy_digest = credentials.hash("gatekeeper-dummy-password")?;

        Ok(Self {
            tokens,
            credentials,
            directory,
            registry,
            dummy_digest,
        })
    }

    /// Create an account with the default role and sign a token for it
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        if self.directory.find_credential_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let digest = self.hash_blocking(password).await?;
        let user = self.registry.create_user(email, digest).await?;
        self.registry.assign_role_by_name(user.id, DEFAULT_ROLE).await?;

        let access_token = self.tokens.issue(&Claims::new(user.id, user.email.clone()))?;
        log_security_event(SecurityEvent::AccountCreated { subject_id: user.id });

        Ok(AuthTokens { access_token, user })
    }

    /// Check credentials and sign a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller,
    /// in both the error returned and the time taken.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let timer = AuthTimer::new(MIN_LOGIN_DURATION);
        let result = self.try_login(email.trim(), password).await;
        timer.wait().await;
        result
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".to_string()));
        }

        let credential = self.directory.find_credential_by_email(email).await?;
        let digest = credential
            .as_ref()
            .map(|c| c.password_digest.clone())
            .unwrap_or_else(|| self.dummy_digest.clone());

        let verified = self.verify_blocking(password, digest).await?;

        let credential = match credential {
            Some(credential) if verified => credential,
            _ => {
                log_security_event(SecurityEvent::AuthenticationFailed {
                    email: email.to_string(),
                    reason: "invalid credentials".to_string(),
                });
                return Err(AuthError::InvalidCredentials);
            }
        };

        let user = self
            .registry
            .get_user(credential.subject_id)
            .await?
            .map(|detailed| detailed.user)
            .ok_or(AuthError::InvalidCredentials)?;

        let access_token = self.tokens.issue(&Claims::new(user.id, user.email.clone()))?;
        log_security_event(SecurityEvent::AuthenticationSuccess { subject_id: user.id });

        Ok(AuthTokens { access_token, user })
    }

    async fn hash_blocking(&self, password: &str) -> Result<String> {
        let credentials = self.credentials.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(format!("hashing task failed: {}", e)))?
    }

    async fn verify_blocking(&self, password: &str, digest: String) -> Result<bool> {
        let credentials = self.credentials.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || credentials.verify(&password, &digest))
            .await
            .map_err(|e| AuthError::Hashing(format!("verification task failed: {}", e)))
    }
}
