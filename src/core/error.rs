use axum::BoxError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Refresh token missing")]
    RefreshTokenMissing,
    #[error("Refresh token invalid")]
    RefreshTokenInvalid,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("User not found")]
    UserNotFound,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Password too long")]
    PasswordTooLong,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("{:?}", self);

        // per-request failures surface a generic message; internal causes
        // stay in the logs
        let (status, message) = match self {
            Error::Sql(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
            Error::Bcrypt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
            Error::Jwt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
            Error::AuthenticationFailed => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
            Error::RefreshTokenMissing => (StatusCode::UNAUTHORIZED, "Refresh token missing".to_string()),
            Error::RefreshTokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid refresh token".to_string()),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Error::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            Error::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists".to_string()),
            Error::InvalidEmail => (StatusCode::BAD_REQUEST, "Invalid email".to_string()),
            Error::InvalidPassword(reason) => (StatusCode::BAD_REQUEST, reason),
            Error::PasswordTooLong => (StatusCode::BAD_REQUEST, "Password too long".to_string()),
        };

        (status, message).into_response()
    }
}

pub(crate) async fn handle_middleware_errors(err: BoxError) -> (StatusCode, &'static str) {
    tracing::error!("Unhandled error: {:?}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
