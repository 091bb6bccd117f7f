//! Gatekeeper - RS256 token authentication and role/permission access control
//!
//! This library provides key loading, token issuance and verification,
//! password credentials, and the guards that sit in front of HTTP handlers.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::ServerConfig;
pub use error::{AuthError, Result};
