//! RSA key store
//!
//! The key pair is read once at startup and handed, immutable, to every
//! component that signs or verifies tokens. A store built from the public key
//! alone can verify but never sign.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{AuthError, Result};

const KEYGEN_HINT: &str = "Generate them with: cargo run --bin generate_keys";

/// Holds the signing and verification key material
pub struct KeyStore {
    encoding_key: Option<EncodingKey>,
    decoding_key: Option<DecodingKey>,
}

impl KeyStore {
    /// Load both keys from their PEM files. Any failure is fatal for startup.
    pub fn load(private_key_path: &Path, public_key_path: &Path) -> Result<Self> {
        let private_pem = read_pem(private_key_path, "private")?;
        let public_pem = read_pem(public_key_path, "public")?;

        let store = Self::from_pem(&private_pem, &public_pem)?;
        log::info!(
            "RSA keys loaded from {} and {}",
            private_key_path.display(),
            public_key_path.display()
        );
        Ok(store)
    }

    /// Load only the public key, for instances that verify tokens but never issue them.
    pub fn load_verifying_only(public_key_path: &Path) -> Result<Self> {
        let public_pem = read_pem(public_key_path, "public")?;
        let store = Self::from_public_pem(&public_pem)?;
        log::info!("RSA public key loaded from {} (verify-only)", public_key_path.display());
        Ok(store)
    }

    /// Build a store from in-memory PEM material and check that the two keys belong together.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| AuthError::KeysUnavailable(format!("unparsable private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AuthError::KeysUnavailable(format!("unparsable public key: {}", e)))?;

        check_pair_matches(&encoding_key, &decoding_key)?;

        Ok(Self {
            encoding_key: Some(encoding_key),
            decoding_key: Some(decoding_key),
        })
    }

    pub fn from_public_pem(public_pem: &[u8]) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AuthError::KeysUnavailable(format!("unparsable public key: {}", e)))?;

        Ok(Self {
            encoding_key: None,
            decoding_key: Some(decoding_key),
        })
    }

    /// Signing key, if this store was loaded with one
    pub fn private_key(&self) -> Result<&EncodingKey> {
        self.encoding_key.as_ref().ok_or(AuthError::KeysNotLoaded("Private"))
    }

    /// Verification key
    pub fn public_key(&self) -> Result<&DecodingKey> {
        self.decoding_key.as_ref().ok_or(AuthError::KeysNotLoaded("Public"))
    }

    pub fn can_sign(&self) -> bool {
        self.encoding_key.is_some()
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        f.debug_struct("KeyStore")
            .field("private_key", &self.encoding_key.is_some())
            .field("public_key", &self.decoding_key.is_some())
            .finish()
    }
}

fn read_pem(path: &Path, kind: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        log::error!("Failed to load RSA {} key from {}", kind, path.display());
        AuthError::KeysUnavailable(format!(
            "cannot read {} key at {}: {}. {}",
            kind,
            path.display(),
            e,
            KEYGEN_HINT
        ))
    })
}

/// Sign a throwaway payload and verify it, so a mismatched or corrupt pair fails at startup.
fn check_pair_matches(encoding_key: &EncodingKey, decoding_key: &DecodingKey) -> Result<()> {
    let sample = serde_json::json!({ "check": true });
    let token = encode(&Header::new(Algorithm::RS256), &sample, encoding_key)
        .map_err(|e| AuthError::KeysUnavailable(format!("private key cannot sign: {}", e)))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    decode::<serde_json::Value>(&token, decoding_key, &validation)
        .map(|_| ())
        .map_err(|_| {
            AuthError::KeysUnavailable("public key does not match private key".to_string())
        })
}
