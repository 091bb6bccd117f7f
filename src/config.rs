//! Server configuration module
//! Handles the runtime parameters of the authentication service

use crate::constants::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PRIVATE_KEY_PATH, DEFAULT_PUBLIC_KEY_PATH,
    DEFAULT_TOKEN_TTL,
};
use crate::error::{AuthError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// PEM file holding the RSA private (signing) key
    pub private_key_path: PathBuf,
    /// PEM file holding the RSA public (verification) key
    pub public_key_path: PathBuf,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            private_key_path: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
            public_key_path: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("GATEKEEPER_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("GATEKEEPER_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let private_key_path = env::var("GATEKEEPER_PRIVATE_KEY_PATH")
            .or_else(|_| env::var("PRIVATE_KEY_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PRIVATE_KEY_PATH));

        let public_key_path = env::var("GATEKEEPER_PUBLIC_KEY_PATH")
            .or_else(|_| env::var("PUBLIC_KEY_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_KEY_PATH));

        // An unparsable TTL must stop startup rather than fall back silently
        let raw_ttl = env::var("GATEKEEPER_TOKEN_TTL").or_else(|_| env::var("JWT_EXPIRES_IN"));
        let token_ttl = match raw_ttl {
            Ok(raw) => parse_ttl(&raw)?,
            Err(_) => DEFAULT_TOKEN_TTL,
        };

        Ok(Self {
            host,
            port,
            private_key_path,
            public_key_path,
            token_ttl,
        })
    }
}

/// Parse a token lifetime such as `3600`, `90s`, `15m`, `12h`, `7d`, `1w` or
/// `2 days`.
///
/// A bare number is seconds. Units are case-insensitive and may be written out
/// (`minutes`, `hrs`, `weeks`, ...); fractional amounts are not accepted.
pub fn parse_ttl(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AuthError::Config("token TTL is empty".to_string()));
    }

    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let amount: u64 = digits
        .parse()
        .map_err(|_| AuthError::Config(format!("invalid token TTL '{}'", raw)))?;
    let unit_secs = unit_seconds(unit.trim())
        .ok_or_else(|| AuthError::Config(format!("unknown unit in token TTL '{}'", raw)))?;

    if amount == 0 {
        return Err(AuthError::Config("token TTL must be greater than zero".to_string()));
    }

    amount
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| AuthError::Config(format!("token TTL '{}' is too large", raw)))
}

fn unit_seconds(unit: &str) -> Option<u64> {
    let secs = match unit.to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 7 * 86_400,
        "y" | "yr" | "yrs" | "year" | "years" => 365 * 86_400,
        _ => return None,
    };
    Some(secs)
}
