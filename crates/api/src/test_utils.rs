//! Shared test utilities for handler and store tests.
//!
//! The centerpiece is [`MemoryKvStore`], an in-memory [`KvStore`] with a
//! manually advanced clock, so TTL expiry is deterministic in tests. Error
//! paths (store unreachable) use the mockall-generated `MockKvStore`
//! instead.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::test_utils::{memory_state, sample_message};
//!
//! let (state, kv) = memory_state();
//! kv.advance_secs(901); // expire every TTL'd record
//! ```

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::models::StoredMessage;
use crate::state::AppState;
use crate::stores::{KvStore, Stores};

struct Entry {
    value: String,
    expires_at: Option<u64>,
}

/// In-memory key-value store with TTL support and a controllable clock.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Entry>>,
    now_secs: AtomicU64,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the fake clock; records whose TTL has elapsed read as absent.
    pub fn advance_secs(&self, secs: u64) {
        self.now_secs.fetch_add(secs, Ordering::SeqCst);
    }

    fn now(&self) -> u64 {
        self.now_secs.load(Ordering::SeqCst)
    }

    fn is_live(&self, entry: &Entry) -> bool {
        entry.expires_at.is_none_or(|at| at > self.now())
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|entry| self.is_live(entry))
            .map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: ttl_secs.map(|ttl| self.now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.lock().unwrap();
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && self.is_live(entry))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Creates a test configuration with dummy values.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        redis_url: "redis://test".to_string(),
        admin_user: "admin@example.com".to_string(),
        admin_password: "hunter2".to_string(),
        session_ttl_seconds: 900,
        thank_you_url: "/thank-you".to_string(),
        env: "test".to_string(),
        sentry_dsn: None,
    }
}

/// `AppState` over any key-value backend.
pub fn test_state(kv: Arc<dyn KvStore>) -> AppState {
    AppState {
        config: test_config(),
        stores: Stores::new(kv),
    }
}

/// `AppState` over a fresh [`MemoryKvStore`], returned alongside it so
/// tests can seed records or advance the clock.
pub fn memory_state() -> (AppState, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    (test_state(kv.clone()), kv)
}

/// Creates a stored message with the given sender and body.
pub fn sample_message(name: &str, email: &str, message: &str) -> StoredMessage {
    StoredMessage {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
        utc_time: "2026-03-01 12:00:00 UTC".to_string(),
        ist_time: "2026-03-01 17:30:00 IST".to_string(),
        client_tz: "Europe/Berlin".to_string(),
        client_time: "2026-03-01 13:00".to_string(),
        ip: "1.2.3.4".to_string(),
        read: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ttl_expiry_follows_the_fake_clock() {
        let kv = MemoryKvStore::new();
        kv.put("a", "1", Some(60)).await.unwrap();
        kv.put("b", "2", None).await.unwrap();

        kv.advance_secs(59);
        assert_eq!(kv.get("a").await.unwrap().as_deref(), Some("1"));

        kv.advance_secs(1);
        assert_eq!(kv.get("a").await.unwrap(), None);
        // No TTL means no expiry.
        assert_eq!(kv.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn list_keys_filters_by_prefix_and_liveness() {
        let kv = MemoryKvStore::new();
        kv.put("msg:1", "x", None).await.unwrap();
        kv.put("msg:2", "y", Some(10)).await.unwrap();
        kv.put("other:3", "z", None).await.unwrap();

        kv.advance_secs(11);

        assert_eq!(kv.list_keys("msg:").await.unwrap(), vec!["msg:1"]);
    }
}
