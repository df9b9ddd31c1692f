use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::{Json, http};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::store::UserStore;
use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{LoginData, NewUserData};
use crate::types::response::{TokenPair, User};

pub(crate) const REFRESH_COOKIE: &str = "refresh_token";

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 255;

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(user_data): Json<NewUserData>,
) -> Result<Json<User>, Error> {
    if !state.email_pattern.is_match(&user_data.email) {
        return Err(Error::InvalidEmail);
    }

    validate_password(&user_data.password)?;

    let digest = state.sessions.hash_password(&user_data.password)?;
    let id = state.store.save(&user_data.email, &digest).await?;

    Ok(Json(User {
        id,
        email: user_data.email,
    }))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(user_data): Json<LoginData>,
) -> Result<(CookieJar, Json<TokenPair>), Error> {
    let session = state
        .sessions
        .issue(&user_data.email, &user_data.password)
        .await?;

    let cookie = Cookie::build((REFRESH_COOKIE, session.refresh_token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            session.refresh_max_age.num_seconds(),
        ))
        .build();

    Ok((jar.add(cookie), Json(session.tokens)))
}

pub(crate) async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<TokenPair>, Error> {
    let refresh_token = jar.get(REFRESH_COOKIE).ok_or(Error::RefreshTokenMissing)?;

    let tokens = state.sessions.renew(refresh_token.value())?;

    Ok(Json(tokens))
}

/// Resolves the bearer access token and stores the user on the request.
/// Every failure mode is a generic `Unauthorized`.
pub(crate) async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(Error::Unauthorized)?;

    let mut header = auth_header
        .to_str()
        .map_err(|_| Error::Unauthorized)?
        .split_whitespace();

    let (_bearer, token) = (header.next(), header.next().unwrap_or_default());

    let user = state.sessions.resolve(token).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn validate_password(password: &str) -> Result<(), Error> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::InvalidPassword(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(Error::InvalidPassword(
            "Password must be at most 255 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("password1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(256)).is_err());
        assert!(validate_password(&"a".repeat(255)).is_ok());
    }
}
