mod common;

use common::{key_path, read_key};
use gatekeeper::auth::keys::KeyStore;
use gatekeeper::error::AuthError;

#[test]
fn test_load_key_pair() {
    let store = KeyStore::load(&key_path("private.pem"), &key_path("public.pem")).unwrap();

    assert!(store.can_sign());
    assert!(store.private_key().is_ok());
    assert!(store.public_key().is_ok());
}

#[test]
fn test_missing_key_file_is_fatal() {
    let result = KeyStore::load(&key_path("does_not_exist.pem"), &key_path("public.pem"));

    match result {
        Err(AuthError::KeysUnavailable(msg)) => {
            assert!(msg.contains("does_not_exist.pem"));
            assert!(msg.contains("generate_keys"));
        }
        other => panic!("expected KeysUnavailable, got {:?}", other),
    }
}

#[test]
fn test_unparsable_key_is_fatal() {
    let result = KeyStore::load(&key_path("not_a_key.pem"), &key_path("public.pem"));
    assert!(matches!(result, Err(AuthError::KeysUnavailable(_))));

    let result = KeyStore::load(&key_path("private.pem"), &key_path("not_a_key.pem"));
    assert!(matches!(result, Err(AuthError::KeysUnavailable(_))));
}

#[test]
fn test_mismatched_pair_is_rejected_at_load() {
    let result = KeyStore::load(&key_path("private.pem"), &key_path("other_public.pem"));

    match result {
        Err(AuthError::KeysUnavailable(msg)) => assert!(msg.contains("does not match")),
        other => panic!("expected KeysUnavailable, got {:?}", other),
    }
}

#[test]
fn test_verify_only_store() {
    let store = KeyStore::load_verifying_only(&key_path("public.pem")).unwrap();

    assert!(!store.can_sign());
    assert!(store.public_key().is_ok());
    assert!(matches!(store.private_key(), Err(AuthError::KeysNotLoaded("Private"))));
}

#[test]
fn test_debug_output_hides_key_material() {
    let store = KeyStore::from_pem(&read_key("private.pem"), &read_key("public.pem")).unwrap();
    let debug = format!("{:?}", store);

    assert!(debug.contains("private_key: true"));
    assert!(!debug.contains("BEGIN"));
}
