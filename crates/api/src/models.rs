use garde::Validate;
use serde::{Deserialize, Serialize};

/// Contact message persisted in the key-value store, keyed by `msg:{uuid}`.
///
/// Created by the public submission path; only the `read` flag is ever
/// mutated afterwards (by admin actions), so updates write the record back
/// in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Submission time, `%Y-%m-%d %H:%M:%S UTC`. Also the inbox sort key.
    pub utc_time: String,
    /// Submission time in IST (UTC+05:30).
    pub ist_time: String,
    pub client_tz: String,
    pub client_time: String,
    /// Submitter's address as seen by this service.
    pub ip: String,
    #[serde(default)]
    pub read: bool,
}

fn unknown() -> String {
    "Unknown".to_string()
}

/// Public contact form submission.
///
/// The form is loosely typed on the wire: every field may be missing and
/// defaults are applied here, before any business logic runs.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactPayload {
    #[serde(default)]
    #[garde(length(max = 200))]
    pub fullname: String,
    #[serde(default)]
    #[garde(length(max = 320))]
    pub email: String,
    #[serde(default)]
    #[garde(length(max = 10_000))]
    pub message: String,
    #[serde(default = "unknown")]
    #[garde(length(max = 100))]
    pub client_tz: String,
    #[serde(default = "unknown")]
    #[garde(length(max = 100))]
    pub client_time: String,
}

/// Admin login form. Credentials are compared against deployment-time
/// secrets, never stored.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[garde(length(min = 1, max = 320))]
    pub email: String,
    #[garde(length(min = 1, max = 320))]
    pub password: String,
}

/// Bulk action applied to stored messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    DeleteAll,
    Read,
    Unread,
    Delete,
}

/// Body of `POST /api/admin/action`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActionPayload {
    pub api_token: String,
    #[serde(rename = "type")]
    pub action: ActionType,
    /// Message ids the action applies to. Not required for `delete_all`.
    #[serde(default)]
    pub ids: Option<Vec<String>>,
}
