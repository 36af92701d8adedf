//! Admin login.
//!
//! Flow:
//! 1. Requests from an IP with 6 failures in the window are refused outright
//! 2. Credentials are compared against deployment-time secrets
//! 3. A failure increments the IP's failure counter (TTL = window)
//! 4. A success clears the counter and mints a credential pair: a one-time
//!    page token (returned in the redirect URL) and a reusable api token
//!    (stored behind it), both IP-bound and sharing one TTL
//!
//! Security notes:
//! - Tokens are 256-bit CSPRNG values; the page link works at most once
//! - Blocked attempts never touch the counter, so abuse cannot extend the
//!   lockout window
//! - The counter check and credential check stay strictly ordered: a
//!   limited IP gets 429 even with correct credentials

use axum::{
    Form, Router, debug_handler, extract::State, http::StatusCode, response::IntoResponse,
    routing::post,
};
use garde::Validate;

use crate::{
    error::AppError,
    handlers::found,
    middleware::client_ip::ClientIp,
    models::LoginPayload,
    state::AppState,
    stores::rate_limit::{LOGIN_FAILURE_LIMIT, LOGIN_FAILURE_WINDOW_SECS, LOGIN_PURPOSE},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(login))
}

#[debug_handler]
async fn login(
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Form(payload): Form<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let failures = state
        .stores
        .rate_limiter
        .current(LOGIN_PURPOSE, &ip)
        .await?;

    if failures >= LOGIN_FAILURE_LIMIT {
        tracing::warn!(ip = %ip, "login blocked: too many failed attempts");
        return Err(AppError::External(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many attempts. Try again later.",
        ));
    }

    if payload.email != state.config.admin_user || payload.password != state.config.admin_password {
        state
            .stores
            .rate_limiter
            .check_and_increment(
                LOGIN_PURPOSE,
                &ip,
                LOGIN_FAILURE_LIMIT,
                LOGIN_FAILURE_WINDOW_SECS,
            )
            .await?;

        tracing::warn!(ip = %ip, "login failed: invalid credentials");
        return Err(AppError::External(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
        ));
    }

    // Successful login clears the failure history before issuing.
    state.stores.rate_limiter.reset(LOGIN_PURPOSE, &ip).await?;

    let pair = state
        .stores
        .sessions
        .issue(&ip, state.config.session_ttl_seconds)
        .await?;

    tracing::info!(ip = %ip, "admin login succeeded");

    Ok(found(&format!("/panel/{}", pair.page_token)))
}
