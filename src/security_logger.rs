//! Security-focused logging module to track authentication and authorization events

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Types of security events to track
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    // Authentication events
    AuthenticationFailed { email: String, reason: String },
    AuthenticationSuccess { subject_id: i64 },
    TokenValidationFailed { reason: String },
    AccountCreated { subject_id: i64 },

    // Authorization events
    PermissionDenied { subject_id: i64, requirement: String },
    DirectoryFailure { operation: String, error: String },
}

impl SecurityEvent {
    /// Counter key for this event kind
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::AccountCreated { .. } => "account_created",
            SecurityEvent::PermissionDenied { .. } => "permission_denied",
            SecurityEvent::DirectoryFailure { .. } => "directory_failure",
        }
    }
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    event_counts: Mutex<HashMap<&'static str, usize>>,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl SecurityLogger {
    /// Create a new security logger
    pub fn new() -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("auth_failed", 5);
        alert_thresholds.insert("token_validation_failed", 10);
        alert_thresholds.insert("permission_denied", 20);
        alert_thresholds.insert("directory_failure", 1);

        Self {
            event_counts: Mutex::new(HashMap::new()),
            alert_thresholds,
        }
    }

    /// Log a security event
    pub fn log_event(&self, event: &SecurityEvent) {
        let key = event.key();

        // Update counters and check for alerts
        {
            let mut counts = self.event_counts.lock().unwrap_or_else(|e| e.into_inner());
            let count = counts.entry(key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(key) {
                if *count % threshold == 0 {
                    log::error!("SECURITY ALERT: {} events of type '{}' detected", count, key);
                }
            }
        }

        match event {
            SecurityEvent::AuthenticationFailed { email, reason } => {
                log::warn!(
                    "SECURITY: Authentication failed - Email: {}, Reason: {}",
                    email,
                    reason
                );
            }
            SecurityEvent::AuthenticationSuccess { subject_id } => {
                log::info!("SECURITY: Authentication success - Subject: {}", subject_id);
            }
            SecurityEvent::TokenValidationFailed { reason } => {
                log::warn!("SECURITY: Token validation failed - Reason: {}", reason);
            }
            SecurityEvent::AccountCreated { subject_id } => {
                log::info!("SECURITY: Account created - Subject: {}", subject_id);
            }
            SecurityEvent::PermissionDenied { subject_id, requirement } => {
                log::warn!(
                    "SECURITY: Permission denied - Subject: {}, Requires: {}",
                    subject_id,
                    requirement
                );
            }
            SecurityEvent::DirectoryFailure { operation, error } => {
                log::error!(
                    "SECURITY: Directory failure - Operation: {}, Error: {}",
                    operation,
                    error
                );
            }
        }
    }

    /// Get event statistics
    pub fn event_counts(&self) -> HashMap<&'static str, usize> {
        self.event_counts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Global security logger instance - thread-safe singleton
static SECURITY_LOGGER: OnceLock<SecurityLogger> = OnceLock::new();

/// Get the global security logger
pub fn security_logger() -> &'static SecurityLogger {
    SECURITY_LOGGER.get_or_init(SecurityLogger::new)
}

/// Log a security event using the global logger
pub fn log_security_event(event: SecurityEvent) {
    security_logger().log_event(&event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_kind() {
        let logger = SecurityLogger::new();
        let expired = SecurityEvent::TokenValidationFailed {
            reason: "Token expired".to_string(),
        };
        logger.log_event(&expired);
        logger.log_event(&expired);
        logger.log_event(&SecurityEvent::AuthenticationSuccess { subject_id: 7 });

        let counts = logger.event_counts();
        assert_eq!(counts.get("token_validation_failed"), Some(&2));
        assert_eq!(counts.get("auth_success"), Some(&1));
        assert_eq!(counts.get("permission_denied"), None);
    }
}
