use axum::Json;
use axum::extract::{Extension, Path, Query, State};

use crate::auth::store::StoredUser;
use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{ListParams, UpdateUserData};
use crate::types::response::{User, UserList};

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<UserList>, Error> {
    let limit = params.limit.clamp(0, state.max_limit);

    let (items, total_count) = state.store.list(params.skip.max(0), limit).await?;

    Ok(Json(UserList { items, total_count }))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, Error> {
    let user = state.store.get(id).await?.ok_or(Error::UserNotFound)?;

    Ok(Json(user))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(current_user): Extension<StoredUser>,
    Json(user_data): Json<UpdateUserData>,
) -> Result<Json<User>, Error> {
    state.store.get(id).await?.ok_or(Error::UserNotFound)?;

    if current_user.id != id {
        return Err(Error::Forbidden);
    }

    if !state.email_pattern.is_match(&user_data.email) {
        return Err(Error::InvalidEmail);
    }

    let user = state.store.update_email(id, &user_data.email).await?;

    Ok(Json(user))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Extension(current_user): Extension<StoredUser>,
) -> Result<Json<serde_json::Value>, Error> {
    state.store.get(id).await?.ok_or(Error::UserNotFound)?;

    if current_user.id != id {
        return Err(Error::Forbidden);
    }

    state.store.delete(id).await?;

    Ok(Json(serde_json::json!({ "detail": "User deleted" })))
}
