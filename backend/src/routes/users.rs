//! User routes
//!
//! A caller can only change or delete their own account, so those
//! operations live under `/users/me` and never take an id.

use super::extract::{ResourceId, ValidJson};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use blog_shared::types::{UpdateUserRequest, UserResponse};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_me).put(update_me).delete(delete_me))
        .route("/:id", get(get_user))
}

/// GET /api/v1/users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserService::list(state.store()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/users/me
async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.store(), auth.user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/users/me
async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::update(state.store(), auth.user_id, req).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/me
async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    UserService::delete(state.store(), auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/:id
async fn get_user(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.store(), id).await?;
    Ok(Json(user.into()))
}
