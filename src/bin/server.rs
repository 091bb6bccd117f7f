use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use gatekeeper::auth::keys::KeyStore;
use gatekeeper::auth::token::TokenService;
use gatekeeper::config::ServerConfig;
use gatekeeper::handlers::{self, AppState};
use gatekeeper::storage::MemoryUserDirectory;

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, token_ttl={}s",
        config.host,
        config.port,
        config.token_ttl.as_secs()
    );

    // Without both keys the service cannot issue or verify anything
    let keys = match KeyStore::load(&config.private_key_path, &config.public_key_path) {
        Ok(keys) => Arc::new(keys),
        Err(e) => {
            error!("Failed to load signing keys: {}", e);
            std::process::exit(1);
        }
    };

    let tokens = Arc::new(TokenService::new(keys, config.token_ttl));
    let directory = Arc::new(MemoryUserDirectory::new());

    let state = match AppState::new(tokens, directory) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize authentication service: {}", e);
            std::process::exit(1);
        }
    };

    let routes = handlers::routes(state);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting Gatekeeper on {}", addr);
    warp::serve(routes).run(addr).await;
}
