//! Comment service
//!
//! Comments hang off a post. Creating one requires the post to exist;
//! edits and deletes are limited to the comment's author.

use crate::error::ApiError;
use crate::repositories::{CommentChanges, CommentRecord, NewComment, Store, StoreError};
use blog_shared::types::{CreateCommentRequest, UpdateCommentRequest};
use tracing::info;

const RESOURCE: &str = "Comment";

pub struct CommentService;

impl CommentService {
    /// Create a comment authored by the caller on an existing post
    pub async fn create(
        store: &Store,
        caller_id: i64,
        req: CreateCommentRequest,
    ) -> Result<CommentRecord, ApiError> {
        Self::ensure_post_exists(store, req.post_id).await?;

        let comments = &store.comments;
        let id = comments
            .create(NewComment {
                user_id: caller_id,
                post_id: req.post_id,
                title: req.title,
                body: req.body,
            })
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "create"))?;

        info!(comment_id = id, post_id = req.post_id, user_id = caller_id, "Comment created");

        comments
            .get(id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "get"))
    }

    pub async fn get(store: &Store, comment_id: i64) -> Result<CommentRecord, ApiError> {
        store
            .comments
            .get(comment_id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "get"))
    }

    pub async fn list(store: &Store) -> Result<Vec<CommentRecord>, ApiError> {
        store
            .comments
            .list()
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "list"))
    }

    /// Comments on one post; an unknown post is not found rather than empty
    pub async fn list_by_post(store: &Store, post_id: i64) -> Result<Vec<CommentRecord>, ApiError> {
        Self::ensure_post_exists(store, post_id).await?;

        store
            .comments
            .list_by_post(post_id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "list"))
    }

    /// Update a comment the caller authored
    pub async fn update(
        store: &Store,
        caller_id: i64,
        comment_id: i64,
        req: UpdateCommentRequest,
    ) -> Result<CommentRecord, ApiError> {
        let comment = store
            .comments
            .update(
                comment_id,
                caller_id,
                CommentChanges {
                    title: req.title,
                    body: req.body,
                },
            )
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "update"))?;

        info!(comment_id, user_id = caller_id, "Comment updated");
        Ok(comment)
    }

    /// Delete a comment the caller authored
    pub async fn delete(store: &Store, caller_id: i64, comment_id: i64) -> Result<(), ApiError> {
        store
            .comments
            .delete(comment_id, caller_id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "delete"))?;

        info!(comment_id, user_id = caller_id, "Comment deleted");
        Ok(())
    }

    async fn ensure_post_exists(store: &Store, post_id: i64) -> Result<(), ApiError> {
        match store.posts.get(post_id).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound) => Err(ApiError::NotFound("Post not found".to_string())),
            Err(e) => Err(ApiError::from_store(e, "Post", "get")),
        }
    }
}
