#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gatekeeper::auth::keys::KeyStore;
use gatekeeper::auth::token::TokenService;

pub fn key_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("keys")
        .join(name)
}

pub fn read_key(name: &str) -> Vec<u8> {
    std::fs::read(key_path(name)).expect("fixture key should exist")
}

pub fn key_store() -> Arc<KeyStore> {
    let store = KeyStore::load(&key_path("private.pem"), &key_path("public.pem"))
        .expect("fixture keys should load");
    Arc::new(store)
}

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(key_store(), Duration::from_secs(3600)))
}

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}
