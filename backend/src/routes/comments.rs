//! Comment routes

use super::extract::{ResourceId, ValidJson};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::CommentService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use blog_shared::types::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route("/:id", get(get_comment).put(update_comment).delete(delete_comment))
}

/// GET /api/v1/comments
async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Vec<CommentResponse>>> {
    let comments = CommentService::list(state.store()).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// POST /api/v1/comments
async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let comment = CommentService::create(state.store(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// GET /api/v1/comments/:id
async fn get_comment(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<CommentResponse>> {
    let comment = CommentService::get(state.store(), id).await?;
    Ok(Json(comment.into()))
}

/// PUT /api/v1/comments/:id
async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
    ValidJson(req): ValidJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let comment = CommentService::update(state.store(), auth.user_id, id, req).await?;
    Ok(Json(comment.into()))
}

/// DELETE /api/v1/comments/:id
async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
) -> ApiResult<StatusCode> {
    CommentService::delete(state.store(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
