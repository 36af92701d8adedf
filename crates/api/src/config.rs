use serde::{Deserialize, Serialize};

fn default_session_ttl() -> u64 {
    900
}

fn default_thank_you_url() -> String {
    "/thank-you".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    /// Admin login name. Deployment-time secret, never request input.
    pub admin_user: String,
    /// Admin password. Deployment-time secret, never request input.
    pub admin_password: String,
    /// Lifetime of a credential pair minted at login.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Where the contact form redirects after a successful submission.
    #[serde(default = "default_thank_you_url")]
    pub thank_you_url: String,
    /// Set to "production" for JSON logging, anything else for human-readable.
    #[serde(default)]
    pub env: String,
    /// Sentry DSN for error tracking.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}
