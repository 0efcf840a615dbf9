//! Post routes

use super::extract::{ResourceId, ValidJson};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{CommentService, PostService};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use blog_shared::types::{CommentResponse, CreatePostRequest, PostResponse, UpdatePostRequest};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/comments", get(list_post_comments))
}

/// GET /api/v1/posts
async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<PostResponse>>> {
    let posts = PostService::list(state.store()).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// POST /api/v1/posts - the caller becomes the owner
async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = PostService::create(state.store(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// GET /api/v1/posts/:id
async fn get_post(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<PostResponse>> {
    let post = PostService::get(state.store(), id).await?;
    Ok(Json(post.into()))
}

/// PUT /api/v1/posts/:id
async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
    ValidJson(req): ValidJson<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post = PostService::update(state.store(), auth.user_id, id, req).await?;
    Ok(Json(post.into()))
}

/// DELETE /api/v1/posts/:id
async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
) -> ApiResult<StatusCode> {
    PostService::delete(state.store(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/posts/:id/comments
async fn list_post_comments(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let comments = CommentService::list_by_post(state.store(), id).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}
