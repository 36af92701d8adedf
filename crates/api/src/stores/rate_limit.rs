//! Rolling-window rate limiting over TTL'd counters.

use std::sync::Arc;

use anyhow::Result;

use super::kv::KvStore;

/// Failed logins allowed per IP before the login endpoint locks out.
pub const LOGIN_FAILURE_LIMIT: i64 = 6;
/// Window for login failure counting (15 minutes).
pub const LOGIN_FAILURE_WINDOW_SECS: u64 = 900;
/// Contact submissions allowed per IP per window.
pub const CONTACT_LIMIT: i64 = 5;
/// Window for contact submission counting.
pub const CONTACT_WINDOW_SECS: u64 = 60;

/// Counter key prefix for login failures.
pub const LOGIN_PURPOSE: &str = "ratelimit:login";
/// Counter key prefix for contact submissions.
pub const CONTACT_PURPOSE: &str = "ratelimit:contact";

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Under the limit, includes current count.
    Allowed(i64),
    /// Over the limit, includes current count.
    Exceeded(i64),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }
}

/// Counts attempts per identity within a rolling window.
///
/// Counters are plain integers stored under `{purpose}:{identity}` with a
/// TTL equal to the window; the window resets implicitly when the key
/// expires. The read-then-write increment is not atomic against concurrent
/// requests, so the limit is a soft ceiling under concurrent abuse.
#[derive(Clone)]
pub struct RateLimiter {
    kv: Arc<dyn KvStore>,
}

impl RateLimiter {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn counter_key(purpose: &str, identity: &str) -> String {
        format!("{}:{}", purpose, identity)
    }

    /// Check the counter and, if under `limit`, increment it.
    ///
    /// A blocked attempt does not write at all: incrementing (or even
    /// rewriting the same count) would refresh the TTL and extend the
    /// window indefinitely under sustained abuse.
    pub async fn check_and_increment(
        &self,
        purpose: &str,
        identity: &str,
        limit: i64,
        window_secs: u64,
    ) -> Result<RateLimitResult> {
        let key = Self::counter_key(purpose, identity);
        let count = self.read_count(&key).await?;

        if count >= limit {
            return Ok(RateLimitResult::Exceeded(count));
        }

        self.kv
            .put(&key, &(count + 1).to_string(), Some(window_secs))
            .await?;

        Ok(RateLimitResult::Allowed(count + 1))
    }

    /// Read the current count without incrementing.
    pub async fn current(&self, purpose: &str, identity: &str) -> Result<i64> {
        let key = Self::counter_key(purpose, identity);
        self.read_count(&key).await
    }

    /// Delete the counter, clearing the identity's history for this purpose.
    pub async fn reset(&self, purpose: &str, identity: &str) -> Result<()> {
        let key = Self::counter_key(purpose, identity);
        self.kv.delete(&key).await
    }

    async fn read_count(&self, key: &str) -> Result<i64> {
        let raw = self.kv.get(key).await?;
        // An absent or unparseable counter reads as zero.
        Ok(raw.and_then(|v| v.parse().ok()).unwrap_or(0))
    }
}
