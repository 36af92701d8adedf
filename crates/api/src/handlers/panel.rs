//! One-time admin inbox page.
//!
//! `GET /panel/{pageToken}` resolves (and thereby consumes) the page token,
//! then renders every stored message with the session's api token embedded
//! for follow-up actions. A bookmarked or leaked panel URL is dead after
//! its first use; the admin logs in again for a fresh link.

use axum::{
    Router, debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse},
    routing::get,
};

use crate::{
    error::AppError, middleware::client_ip::ClientIp, models::StoredMessage, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{token}", get(show_panel))
}

#[debug_handler]
async fn show_panel(
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state
        .stores
        .sessions
        .resolve_page(&token, &ip)
        .await
        .map_err(AppError::from_session)?;

    let messages = state.stores.messages.list().await?;

    tracing::info!(ip = %ip, messages = messages.len(), "admin panel served");

    Ok(Html(render_inbox(&messages, &session.api_token)))
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Pure templating: the only state here is what the caller passes in. The
/// api token is embedded on purpose - it is what authorizes the page's
/// action buttons.
fn render_inbox(messages: &[(String, StoredMessage)], api_token: &str) -> String {
    let rows: String = messages
        .iter()
        .map(|(id, m)| {
            format!(
                concat!(
                    "<tr data-id=\"{id}\" class=\"{class}\">",
                    "<td><input type=\"checkbox\" class=\"pick\"></td>",
                    "<td>{name}</td><td>{email}</td><td>{ip}</td>",
                    "<td class=\"msg\">{message}</td><td>{time}</td>",
                    "</tr>\n"
                ),
                id = escape_html(id),
                class = if m.read { "read" } else { "unread" },
                name = escape_html(&m.name),
                email = escape_html(&m.email),
                ip = escape_html(&m.ip),
                message = escape_html(&m.message),
                time = escape_html(&m.utc_time),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Messages</title>
<style>
body {{ background: #111; color: #fff; font-family: sans-serif; padding: 40px; }}
table {{ width: 100%; border-collapse: collapse; background: #fff; color: #000; }}
th, td {{ padding: 10px; border-bottom: 1px solid #ddd; text-align: left; vertical-align: top; }}
th {{ background: #e7e7e7; }}
tr.read {{ color: #888; }}
.msg {{ white-space: pre-wrap; }}
.actions {{ margin-bottom: 14px; }}
button {{ margin-right: 8px; padding: 6px 10px; }}
</style>
</head>
<body>
<h1>Messages</h1>
<div class="actions">
<button data-action="read">Mark read</button>
<button data-action="unread">Mark unread</button>
<button data-action="delete">Delete</button>
<button data-action="delete_all">Delete all</button>
</div>
<table>
<thead><tr><th></th><th>Name</th><th>Email</th><th>IP</th><th>Message</th><th>Timestamp (UTC)</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<script>
const apiToken = "{api_token}";
document.querySelectorAll('.actions button').forEach(btn => {{
  btn.addEventListener('click', async () => {{
    const ids = [...document.querySelectorAll('tr')]
      .filter(tr => tr.querySelector('.pick')?.checked)
      .map(tr => tr.dataset.id);
    const type = btn.dataset.action;
    await fetch('/api/admin/action', {{
      method: 'POST',
      headers: {{ 'content-type': 'application/json' }},
      body: JSON.stringify(type === 'delete_all' ? {{ apiToken, type }} : {{ apiToken, type, ids }})
    }});
    location.reload();
  }});
}});
</script>
</body>
</html>"#,
        rows = rows,
        api_token = api_token,
    )
}
