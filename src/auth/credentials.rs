//! Password hashing and verification
//!
//! Pure crypto: no length or complexity policy is applied here, that belongs
//! to the registration flow.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::constants::{
    PASSWORD_HASH_ITERATIONS, PASSWORD_HASH_MEMORY_KIB, PASSWORD_HASH_PARALLELISM,
};
use crate::error::{AuthError, Result};

/// Salted Argon2id hashing with fixed cost parameters
#[derive(Clone)]
pub struct CredentialService {
    hasher: Argon2<'static>,
}

impl CredentialService {
    pub fn new() -> Result<Self> {
        let params = Params::new(
            PASSWORD_HASH_MEMORY_KIB,
            PASSWORD_HASH_ITERATIONS,
            PASSWORD_HASH_PARALLELISM,
            None,
        )
        .map_err(|e| AuthError::Hashing(format!("invalid hash parameters: {}", e)))?;

        Ok(Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `plaintext` with a fresh random salt. Returns a PHC-format digest.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// Cost parameters and salt are read from the digest itself; the final
    /// comparison is the hash library's constant-time one. A digest that cannot
    /// be parsed never matches.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Stored password digest is unparsable: {}", e);
                return false;
            }
        };

        self.hasher.verify_password(plaintext.as_bytes(), &parsed).is_ok()
    }
}
