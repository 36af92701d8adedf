//! Key-value backed stores.
//!
//! Every piece of cross-request state lives in one external key-value map
//! with per-key TTL, behind the [`kv::KvStore`] trait. The components here
//! are thin, stateless views over it.
//!
//! ## Key Patterns
//!
//! ```text
//! session_page:{token}          → one-time page session JSON (TTL)
//! session_api:{token}           → reusable api session JSON (TTL)
//! ratelimit:login:{ip}          → login failure counter (TTL = window)
//! ratelimit:contact:{ip}        → contact submission counter (TTL = window)
//! msg:{uuid}                    → stored contact message JSON (no TTL)
//! ```
//!
//! ## Usage in Handlers
//!
//! Stores are accessed via `state.stores`:
//!
//! ```ignore
//! async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     let pair = state.stores.sessions.issue(&ip, ttl).await?;
//! }
//! ```

pub mod kv;
pub mod messages;
pub mod rate_limit;
pub mod sessions;

pub use kv::{KvStore, RedisKvStore};
pub use messages::MessageStore;
pub use rate_limit::{RateLimitResult, RateLimiter};
pub use sessions::{SessionError, SessionStore};

#[cfg(test)]
pub use kv::MockKvStore;

use std::sync::Arc;

/// Collection of all key-value backed stores.
#[derive(Clone)]
pub struct Stores {
    /// The shared backend itself (health checks go straight to it).
    pub kv: Arc<dyn KvStore>,
    pub rate_limiter: RateLimiter,
    pub sessions: SessionStore,
    pub messages: MessageStore,
}

impl Stores {
    /// Build every store over one shared backend.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            rate_limiter: RateLimiter::new(kv.clone()),
            sessions: SessionStore::new(kv.clone()),
            messages: MessageStore::new(kv.clone()),
            kv,
        }
    }
}
