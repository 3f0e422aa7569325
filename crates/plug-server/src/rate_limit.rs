//! Sliding-window attempt limiter keyed by caller address.
//!
//! State is process-local and lost on restart; several instances behind a
//! load balancer each keep their own counts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Allows at most `max_attempts` per key within any rolling `window`.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt for `key` now. Returns `false` if over the limit.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    /// Record an attempt for `key` at `now`.
    ///
    /// Expired timestamps are dropped first; the remaining count is compared
    /// against the limit before the new attempt is recorded, so rejected
    /// attempts do not extend the lockout.
    pub async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut attempts = self.attempts.lock().await;
        let recent = attempts.entry(key.to_string()).or_default();
        recent.retain(|t| now.duration_since(*t) < self.window);

        if recent.len() >= self.max_attempts {
            return false;
        }

        recent.push(now);
        true
    }

    /// Drop keys whose attempts have all expired. Returns how many were removed.
    pub async fn sweep_at(&self, now: Instant) -> usize {
        let mut attempts = self.attempts.lock().await;
        let before = attempts.len();
        attempts.retain(|_, recent| {
            recent.retain(|t| now.duration_since(*t) < self.window);
            !recent.is_empty()
        });
        before - attempts.len()
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.attempts.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[tokio::test]
    async fn test_sixth_attempt_rejected() {
        let limiter = RateLimiter::new(5, HOUR);
        let t0 = Instant::now();
        for i in 0..5 {
            assert!(limiter.check_at("1.2.3.4", t0 + minutes(i)).await, "attempt {i}");
        }
        assert!(!limiter.check_at("1.2.3.4", t0 + minutes(10)).await);
    }

    #[tokio::test]
    async fn test_allowed_again_after_earliest_expires() {
        let limiter = RateLimiter::new(5, HOUR);
        let t0 = Instant::now();
        for i in 0..5 {
            assert!(limiter.check_at("ip", t0 + minutes(i)).await);
        }
        assert!(!limiter.check_at("ip", t0 + minutes(59)).await);
        // The first attempt is now exactly one window old.
        assert!(limiter.check_at("ip", t0 + minutes(60)).await);
        // Window is full again until the second attempt expires.
        assert!(!limiter.check_at("ip", t0 + minutes(60)).await);
        assert!(limiter.check_at("ip", t0 + minutes(61)).await);
    }

    #[tokio::test]
    async fn test_rejected_attempts_not_recorded() {
        let limiter = RateLimiter::new(1, HOUR);
        let t0 = Instant::now();
        assert!(limiter.check_at("ip", t0).await);
        for m in 1..30 {
            assert!(!limiter.check_at("ip", t0 + minutes(m)).await);
        }
        assert!(limiter.check_at("ip", t0 + minutes(60)).await);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, HOUR);
        let t0 = Instant::now();
        assert!(limiter.check_at("a", t0).await);
        assert!(!limiter.check_at("a", t0).await);
        assert!(limiter.check_at("b", t0).await);
    }

    #[tokio::test]
    async fn test_sweep_removes_idle_keys() {
        let limiter = RateLimiter::new(5, HOUR);
        let t0 = Instant::now();
        limiter.check_at("old", t0).await;
        limiter.check_at("fresh", t0 + minutes(50)).await;
        assert_eq!(limiter.tracked_keys().await, 2);

        assert_eq!(limiter.sweep_at(t0 + minutes(70)).await, 1);
        assert_eq!(limiter.tracked_keys().await, 1);
    }
}
