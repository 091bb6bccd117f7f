//! RSA key pair generation
//!
//! Writes a 2048-bit PKCS#8 private key and the matching SPKI public key as
//! PEM files, in the layout [`KeyStore::load`](crate::auth::keys::KeyStore::load)
//! reads at startup. Existing key files are never overwritten.

use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{AuthError, Result};

pub const RSA_KEY_BITS: usize = 2048;

/// Generate a fresh key pair and write it to `private_key_path` / `public_key_path`.
///
/// Fails without touching either file if one of them already exists.
pub fn generate_key_pair(private_key_path: &Path, public_key_path: &Path) -> Result<()> {
    for path in [private_key_path, public_key_path] {
        if path.exists() {
            return Err(AuthError::KeyGeneration(format!(
                "{} already exists, refusing to overwrite",
                path.display()
            )));
        }
    }

    let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, RSA_KEY_BITS)
        .map_err(|e| AuthError::KeyGeneration(format!("RSA generation failed: {}", e)))?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| AuthError::KeyGeneration(format!("PKCS#8 encoding failed: {}", e)))?;
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| AuthError::KeyGeneration(format!("SPKI encoding failed: {}", e)))?;

    write_new(private_key_path, private_pem.as_bytes(), true)?;
    write_new(public_key_path, public_pem.as_bytes(), false)?;

    log::info!(
        "RSA key pair written to {} and {}",
        private_key_path.display(),
        public_key_path.display()
    );
    Ok(())
}

fn write_new(path: &Path, contents: &[u8], secret: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AuthError::KeyGeneration(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(if secret { 0o600 } else { 0o644 });
    }
    #[cfg(not(unix))]
    let _ = secret;

    let mut file = options
        .open(path)
        .map_err(|e| AuthError::KeyGeneration(format!("cannot create {}: {}", path.display(), e)))?;
    file.write_all(contents)
        .map_err(|e| AuthError::KeyGeneration(format!("cannot write {}: {}", path.display(), e)))
}
