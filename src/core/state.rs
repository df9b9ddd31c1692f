use chrono::Duration;
use regex::Regex;
use sqlx::postgres::PgPool;

use crate::auth::session::{SessionConfig, SessionController};
use crate::core::config::Args;
use crate::core::error::ConfigError;
use crate::core::store::PgUserStore;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) store: PgUserStore,
    pub(crate) sessions: SessionController<PgUserStore>,
    pub(crate) email_pattern: Regex,
    pub(crate) max_limit: i64,
}

impl AppState {
    pub(crate) fn new(pool: PgPool, config: &Args) -> Result<Self, ConfigError> {
        let store = PgUserStore::new(pool);

        let session_config = SessionConfig {
            access_lifetime: Duration::minutes(config.access_token_minutes),
            refresh_lifetime: Duration::days(config.refresh_token_days),
            bcrypt_cost: config.bcrypt_cost,
        };

        Ok(AppState {
            store: store.clone(),
            sessions: SessionController::new(store, &config.secret, session_config),
            email_pattern: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?,
            max_limit: config.max_limit,
        })
    }
}
