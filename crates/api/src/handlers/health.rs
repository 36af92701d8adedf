//! Health check endpoint for load balancers and monitoring.
//!
//! Returns 200 OK if the key-value backend is reachable, 503 Service
//! Unavailable otherwise.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: bool,
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.stores.kv.health_check().await.unwrap_or(false);

    let response = HealthResponse {
        status: if store_ok { "ok" } else { "unhealthy" },
        store: store_ok,
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::memory_state;

    #[tokio::test]
    async fn healthy_when_store_responds() {
        let (state, _kv) = memory_state();

        let response = health_check(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
