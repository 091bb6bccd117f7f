use gatekeeper::auth::credentials::CredentialService;

#[test]
fn test_hash_is_salted() {
    let credentials = CredentialService::new().unwrap();

    let first = credentials.hash("hunter22").unwrap();
    let second = credentials.hash("hunter22").unwrap();

    assert_ne!(first, second);
    assert!(credentials.verify("hunter22", &first));
    assert!(credentials.verify("hunter22", &second));
}

#[test]
fn test_wrong_password_does_not_verify() {
    let credentials = CredentialService::new().unwrap();
    let digest = credentials.hash("correct horse").unwrap();

    assert!(!credentials.verify("correct hors", &digest));
    assert!(!credentials.verify("", &digest));
    assert!(!credentials.verify("Correct horse", &digest));
}

#[test]
fn test_digest_from_another_instance_verifies() {
    let digest = CredentialService::new().unwrap().hash("portable secret").unwrap();
    let other = CredentialService::new().unwrap();

    assert!(other.verify("portable secret", &digest));
}

#[test]
fn test_empty_and_unicode_passwords_hash() {
    let credentials = CredentialService::new().unwrap();

    let empty = credentials.hash("").unwrap();
    assert!(credentials.verify("", &empty));

    let unicode = credentials.hash("pässwörd 🔑").unwrap();
    assert!(credentials.verify("pässwörd 🔑", &unicode));
    assert!(!credentials.verify("passwort 🔑", &unicode));
}

#[test]
fn test_corrupt_digest_never_matches() {
    let credentials = CredentialService::new().unwrap();

    assert!(!credentials.verify("anything", "not-a-digest"));
    assert!(!credentials.verify("anything", ""));
    assert!(!credentials.verify("anything", "$argon2id$v=19$m=19456,t=2,p=1$broken"));
}
