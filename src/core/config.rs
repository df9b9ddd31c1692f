use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) database_host: String,
    pub(crate) database_port: u16,
    pub(crate) database_name: String,
    pub(crate) database_user: String,
    pub(crate) database_password: String,
    pub(crate) log_level: String,
    pub(crate) port: u16,
    pub(crate) secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub(crate) access_token_minutes: i64,
    #[serde(default = "default_refresh_token_days")]
    pub(crate) refresh_token_days: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub(crate) bcrypt_cost: u32,
    #[serde(default = "default_max_limit")]
    pub(crate) max_limit: i64,
}

fn default_access_token_minutes() -> i64 {
    15
}

fn default_refresh_token_days() -> i64 {
    30
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_max_limit() -> i64 {
    50
}
