pub mod admin;
pub mod contact;
pub mod health;
pub mod login;
pub mod panel;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// 302 Found redirect. The browser flows here (contact submission, login)
/// are classic form-POST-then-redirect and expect 302 semantics.
pub(crate) fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
