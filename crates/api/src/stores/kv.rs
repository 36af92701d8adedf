//! Key-value storage abstraction.
//!
//! All persisted state (sessions, rate-limit counters, messages) lives in a
//! single durable string-to-string map with per-key TTL. Handlers hold no
//! state across requests, so the store is the only shared mutable resource
//! and every component built on it is safely replicable. Expiry is enforced
//! by the store itself - nothing here depends on a cleanup job running.

use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Durable key-value map with optional per-key TTL.
///
/// The backing store is assumed eventually consistent across replicas: a
/// write may not be immediately visible to a read from another edge.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Health check - verify the backend is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Get a value by key. Expired keys read as absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Put a value, optionally expiring after `ttl_secs`.
    async fn put(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<()>;

    /// Delete a key. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List all keys starting with `prefix`.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Redis implementation of KvStore.
#[derive(Clone)]
pub struct RedisKvStore {
    client: redis::Client,
}

impl RedisKvStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let result: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(result == "PONG")
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        match ttl_secs {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // Keyspace is small (one key per stored message); KEYS is fine here.
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{}*", prefix))
            .query_async(&mut conn)
            .await?;
        Ok(keys)
    }
}
