//! Public contact form submission.
//!
//! No authentication; abuse is throttled per IP (5 submissions per minute).
//! The form body is loosely typed - every field is optional on the wire and
//! defaults are applied at the boundary before anything is persisted.

use axum::{
    Form, Router, debug_handler, extract::State, http::StatusCode, response::IntoResponse,
    routing::post,
};
use chrono::{FixedOffset, Utc};
use garde::Validate;

use crate::{
    error::AppError,
    handlers::found,
    middleware::client_ip::ClientIp,
    models::{ContactPayload, StoredMessage},
    state::AppState,
    stores::rate_limit::{CONTACT_LIMIT, CONTACT_PURPOSE, CONTACT_WINDOW_SECS},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_contact))
}

/// IST is a fixed offset (UTC+05:30), no DST.
fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("offset in range")
}

#[debug_handler]
async fn submit_contact(
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Form(payload): Form<ContactPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let decision = state
        .stores
        .rate_limiter
        .check_and_increment(CONTACT_PURPOSE, &ip, CONTACT_LIMIT, CONTACT_WINDOW_SECS)
        .await?;

    if !decision.is_allowed() {
        tracing::warn!(ip = %ip, "contact submission rate limited");
        return Err(AppError::External(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests",
        ));
    }

    let now = Utc::now();
    let message = StoredMessage {
        name: payload.fullname,
        email: payload.email,
        message: payload.message,
        utc_time: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ist_time: now
            .with_timezone(&ist_offset())
            .format("%Y-%m-%d %H:%M:%S IST")
            .to_string(),
        client_tz: payload.client_tz,
        client_time: payload.client_time,
        ip: ip.clone(),
        read: false,
    };

    let id = state.stores.messages.create(&message).await?;

    tracing::info!(ip = %ip, message_id = %id, "contact message stored");

    Ok(found(&state.config.thank_you_url))
}
