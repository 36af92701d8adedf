//! Authorized bulk actions against stored messages.
//!
//! Every call resolves the api token first; a validator failure aborts with
//! its status and nothing is mutated. Per-id mutations are independent -
//! there is no transaction across a batch, so a mid-batch store failure can
//! leave it partially applied. Each individual operation is idempotent and
//! the client re-renders from the store afterwards, so retrying the whole
//! call is always safe.

use axum::{
    Json, Router, debug_handler,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::post,
};

use crate::{
    error::AppError,
    middleware::client_ip::ClientIp,
    models::{ActionType, AdminActionPayload},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/action", post(apply_action))
}

#[debug_handler]
async fn apply_action(
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    payload: Result<Json<AdminActionPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|_| AppError::Validation("Bad JSON".to_string()))?;

    state
        .stores
        .sessions
        .resolve_api(&payload.api_token, &ip)
        .await
        .map_err(AppError::from_session)?;

    match payload.action {
        ActionType::DeleteAll => {
            state.stores.messages.delete_all().await?;
            tracing::info!(ip = %ip, "all messages deleted");
        }
        ActionType::Read | ActionType::Unread | ActionType::Delete => {
            let ids = payload
                .ids
                .ok_or_else(|| AppError::Validation("Missing ids".to_string()))?;

            for id in &ids {
                match payload.action {
                    ActionType::Delete => state.stores.messages.delete(id).await?,
                    ActionType::Read | ActionType::Unread => {
                        // Stale client-side ids are skipped, not errors.
                        let Some(mut message) = state.stores.messages.get(id).await? else {
                            continue;
                        };
                        message.read = payload.action == ActionType::Read;
                        state.stores.messages.put(id, &message).await?;
                    }
                    ActionType::DeleteAll => unreachable!(),
                }
            }
            tracing::info!(ip = %ip, action = ?payload.action, count = ids.len(), "admin action applied");
        }
    }

    Ok("OK")
}
