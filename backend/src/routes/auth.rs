//! Authentication routes
//!
//! Sign-up and sign-in are the only endpoints reachable without a token.
//! Password hashing runs on the blocking thread pool inside the service.

use super::extract::ValidJson;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use blog_shared::types::{SignInRequest, SignUpRequest, SignUpResponse, TokenResponse};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
}

/// Register a new user
///
/// POST /api/v1/auth/sign-up
async fn sign_up(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<SignUpResponse>)> {
    let id = UserService::sign_up(state.store(), req).await?;
    Ok((StatusCode::CREATED, Json(SignUpResponse { id })))
}

/// Exchange email and password for a bearer token
///
/// POST /api/v1/auth/sign-in
async fn sign_in(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SignInRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let tokens = UserService::sign_in(state.store(), state.tokens(), req).await?;
    Ok(Json(tokens))
}
