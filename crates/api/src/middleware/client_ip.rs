//! Requester IP extraction.
//!
//! Usage: add `ClientIp` as an extractor parameter. Sessions are bound to
//! this address and rate-limit counters are keyed by it.
//!
//! ```ignore
//! async fn my_handler(ClientIp(ip): ClientIp, ...) -> ... {
//!     // ip is available here
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

/// Requester address: first hop of `X-Forwarded-For` if a proxy set it,
/// then `X-Real-IP`, then the socket peer. Falls back to "0.0.0.0" so the
/// auth path never panics on a malformed header - an unattributable
/// request just shares one rate-limit bucket.
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            && let Some(first) = forwarded.split(',').next()
        {
            let first = first.trim();
            if !first.is_empty() {
                return Ok(ClientIp(first.to_string()));
            }
        }

        if let Some(real_ip) = parts.headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
            let real_ip = real_ip.trim();
            if !real_ip.is_empty() {
                return Ok(ClientIp(real_ip.to_string()));
            }
        }

        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(ClientIp(ip))
    }
}
