use log::{error, info, warn};
use std::path::Path;

use gatekeeper::auth::keygen::generate_key_pair;
use gatekeeper::constants::{DEFAULT_PRIVATE_KEY_PATH, DEFAULT_PUBLIC_KEY_PATH};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let private_key_path = Path::new(DEFAULT_PRIVATE_KEY_PATH);
    let public_key_path = Path::new(DEFAULT_PUBLIC_KEY_PATH);

    info!("Generating RSA key pair...");
    if let Err(e) = generate_key_pair(private_key_path, public_key_path) {
        error!("Key generation failed: {}", e);
        std::process::exit(1);
    }

    info!("Private key (sign): {}", private_key_path.display());
    info!("Public key (verify): {}", public_key_path.display());
    warn!("Keep the private key secret and out of version control");
}
