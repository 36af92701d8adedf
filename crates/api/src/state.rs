use crate::{config::Config, stores::Stores};

#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Key-value backed stores (sessions, counters, messages).
    pub stores: Stores,
}
