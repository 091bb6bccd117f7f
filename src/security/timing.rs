//! Timing attack protection utilities
//!
//! Login must not reveal whether an email is registered through how long it
//! takes to answer.

use std::time::{Duration, Instant};

/// Add artificial delay so the caller never returns before `min_duration`
pub async fn add_auth_delay(start_time: Instant, min_duration: Duration) {
    let elapsed = start_time.elapsed();
    if elapsed < min_duration {
        tokio::time::sleep(min_duration - elapsed).await;
    }
}

/// Authentication timing helper
pub struct AuthTimer {
    start: Instant,
    min_duration: Duration,
}

impl AuthTimer {
    /// Create a new auth timer with minimum duration
    pub fn new(min_duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            min_duration,
        }
    }

    /// Wait until minimum duration has elapsed
    pub async fn wait(self) {
        add_auth_delay(self.start, self.min_duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auth_timer() {
        let timer = AuthTimer::new(Duration::from_millis(10));
        let start = Instant::now();
        timer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_auth_timer_does_not_wait_when_elapsed() {
        let timer = AuthTimer::new(Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(5)).await;

        let start = Instant::now();
        timer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
