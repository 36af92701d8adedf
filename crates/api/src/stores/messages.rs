//! Contact message storage.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use super::kv::KvStore;
use crate::models::StoredMessage;

const MSG_KEY_PREFIX: &str = "msg:";

/// Stores contact messages as JSON under `msg:{uuid}`, without TTL.
#[derive(Clone)]
pub struct MessageStore {
    kv: Arc<dyn KvStore>,
}

impl MessageStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn msg_key(id: &str) -> String {
        format!("{}{}", MSG_KEY_PREFIX, id)
    }

    /// Persist a new message under a fresh id. Returns the id.
    pub async fn create(&self, message: &StoredMessage) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.put(&id, message).await?;
        Ok(id)
    }

    /// Fetch a message by id. Absent ids read as `None`.
    pub async fn get(&self, id: &str) -> Result<Option<StoredMessage>> {
        let raw = self.kv.get(&Self::msg_key(id)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Write a message back in full.
    pub async fn put(&self, id: &str, message: &StoredMessage) -> Result<()> {
        self.kv
            .put(&Self::msg_key(id), &serde_json::to_string(message)?, None)
            .await
    }

    /// Delete a message. Idempotent: absent ids are a no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.kv.delete(&Self::msg_key(id)).await
    }

    /// All messages, newest first.
    ///
    /// Records that vanished between the key listing and the fetch, or that
    /// no longer parse, are skipped rather than failing the whole listing.
    pub async fn list(&self) -> Result<Vec<(String, StoredMessage)>> {
        let keys = self.kv.list_keys(MSG_KEY_PREFIX).await?;

        let mut messages = Vec::with_capacity(keys.len());
        for key in keys {
            let id = key.trim_start_matches(MSG_KEY_PREFIX).to_string();
            let Some(raw) = self.kv.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<StoredMessage>(&raw) {
                Ok(message) => messages.push((id, message)),
                Err(err) => {
                    tracing::warn!(id = %id, "skipping unreadable message record: {}", err);
                }
            }
        }

        messages.sort_by(|(_, a), (_, b)| b.utc_time.cmp(&a.utc_time));
        Ok(messages)
    }

    /// Delete every stored message.
    ///
    /// Each delete is independent and idempotent; a mid-batch store failure
    /// leaves the remainder in place and the whole operation is safe to
    /// retry.
    pub async fn delete_all(&self) -> Result<()> {
        for key in self.kv.list_keys(MSG_KEY_PREFIX).await? {
            self.kv.delete(&key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MemoryKvStore, sample_message};

    fn store() -> (MessageStore, Arc<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (MessageStore::new(kv.clone()), kv)
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (messages, _kv) = store();
        let msg = sample_message("Alice", "a@x.com", "hi");

        let id = messages.create(&msg).await.unwrap();
        let fetched = messages.get(&id).await.unwrap().unwrap();

        assert_eq!(fetched, msg);
    }

    #[tokio::test]
    async fn list_is_sorted_newest_first() {
        let (messages, _kv) = store();

        let mut old = sample_message("Old", "o@x.com", "first");
        old.utc_time = "2026-01-01 00:00:00 UTC".to_string();
        let mut new = sample_message("New", "n@x.com", "second");
        new.utc_time = "2026-06-01 00:00:00 UTC".to_string();

        messages.create(&old).await.unwrap();
        messages.create(&new).await.unwrap();

        let listed = messages.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].1.name, "New");
        assert_eq!(listed[1].1.name, "Old");
    }

    #[tokio::test]
    async fn list_skips_unparseable_records() {
        let (messages, kv) = store();
        messages
            .create(&sample_message("Alice", "a@x.com", "hi"))
            .await
            .unwrap();
        kv.put("msg:broken", "not json", None).await.unwrap();

        let listed = messages.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1.name, "Alice");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (messages, _kv) = store();

        messages.delete("no-such-id").await.unwrap();

        let msg = sample_message("Alice", "a@x.com", "hi");
        let id = messages.create(&msg).await.unwrap();
        messages.delete(&id).await.unwrap();
        messages.delete(&id).await.unwrap();

        assert!(messages.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_all_empties_the_store() {
        let (messages, _kv) = store();
        for i in 0..3 {
            messages
                .create(&sample_message(&format!("User{}", i), "u@x.com", "hey"))
                .await
                .unwrap();
        }

        messages.delete_all().await.unwrap();

        assert!(messages.list().await.unwrap().is_empty());
    }
}
