//! Session issuance and validation.
//!
//! A successful login mints a credential pair: a one-time *page token*
//! (delivered in the redirect URL, opens the inbox once) and a reusable
//! *api token* (embedded in the rendered inbox, authorizes admin actions
//! until TTL expiry). Both are IP-bound to the address that logged in.

use std::sync::Arc;

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::kv::KvStore;

const PAGE_KEY_PREFIX: &str = "session_page:";
const API_KEY_PREFIX: &str = "session_api:";

/// Tokens minted together at login, sharing one TTL.
#[derive(Debug, Clone)]
pub struct CredentialPair {
    pub page_token: String,
    pub api_token: String,
}

/// Record behind a page token. Links to the api token so the rendered
/// inbox can authorize follow-up actions.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageSession {
    pub api_token: String,
    pub bound_ip: String,
}

/// Record behind an api token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSession {
    pub bound_ip: String,
}

/// Why a token failed to resolve.
#[derive(Debug)]
pub enum SessionError {
    /// Page token absent: never issued, already used, or TTL elapsed.
    Expired,
    /// Api token absent or no longer valid.
    Forbidden,
    /// Token presented from a different address than it was issued to.
    IpMismatch,
    /// Session record exists but does not parse.
    Corrupted,
    /// The store itself failed. Never a default-allow.
    Backend(anyhow::Error),
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        SessionError::Backend(err)
    }
}

/// 256-bit token from the thread-local CSPRNG, hex-encoded (64 chars).
fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Issues and resolves IP-bound session records in the key-value store.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KvStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn page_key(token: &str) -> String {
        format!("{}{}", PAGE_KEY_PREFIX, token)
    }

    fn api_key(token: &str) -> String {
        format!("{}{}", API_KEY_PREFIX, token)
    }

    /// Mint a credential pair bound to `ip`, both records expiring after
    /// `ttl_secs`.
    ///
    /// The two writes are independent. If the api write fails after the
    /// page write succeeded, the page token dangles: resolving it yields a
    /// session whose api token has no record, and actions against that api
    /// token are refused. Invalid, not a crash.
    pub async fn issue(&self, ip: &str, ttl_secs: u64) -> Result<CredentialPair> {
        let pair = CredentialPair {
            page_token: random_token(),
            api_token: random_token(),
        };

        let page = PageSession {
            api_token: pair.api_token.clone(),
            bound_ip: ip.to_string(),
        };
        self.kv
            .put(
                &Self::page_key(&pair.page_token),
                &serde_json::to_string(&page)?,
                Some(ttl_secs),
            )
            .await?;

        let api = ApiSession {
            bound_ip: ip.to_string(),
        };
        self.kv
            .put(
                &Self::api_key(&pair.api_token),
                &serde_json::to_string(&api)?,
                Some(ttl_secs),
            )
            .await?;

        Ok(pair)
    }

    /// Resolve a page token, consuming it.
    ///
    /// The record is deleted before the IP check, so a token that fails IP
    /// binding is still spent and can never be retried. A leaked panel URL
    /// (browser history, referrer) works at most once, which is the point -
    /// but it also means a legitimate admin behind a shifting IP loses the
    /// link on first attempt and must log in again.
    pub async fn resolve_page(&self, token: &str, ip: &str) -> Result<PageSession, SessionError> {
        let key = Self::page_key(token);

        let raw = match self.kv.get(&key).await? {
            Some(raw) => raw,
            None => return Err(SessionError::Expired),
        };

        // One-time use: spend the token before anything else can fail.
        self.kv.delete(&key).await?;

        let session: PageSession =
            serde_json::from_str(&raw).map_err(|_| SessionError::Corrupted)?;

        if session.bound_ip != ip {
            return Err(SessionError::IpMismatch);
        }

        Ok(session)
    }

    /// Resolve an api token. Not consumed - the inbox issues multiple
    /// action calls against the same session, so the record lives until
    /// its TTL elapses.
    pub async fn resolve_api(&self, token: &str, ip: &str) -> Result<ApiSession, SessionError> {
        let raw = match self.kv.get(&Self::api_key(token)).await? {
            Some(raw) => raw,
            None => return Err(SessionError::Forbidden),
        };

        let session: ApiSession =
            serde_json::from_str(&raw).map_err(|_| SessionError::Corrupted)?;

        if session.bound_ip != ip {
            return Err(SessionError::IpMismatch);
        }

        Ok(session)
    }
}
