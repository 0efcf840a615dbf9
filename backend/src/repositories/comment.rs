//! Comment repository for database operations

use super::{StoreError, StoreResult};
use async_trait::async_trait;
use blog_shared::types::CommentResponse;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Comment record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRecord> for CommentResponse {
    fn from(comment: CommentRecord) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            post_id: comment.post_id,
            title: comment.title,
            body: comment.body,
            created_at: comment.created_at,
        }
    }
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i64,
    pub post_id: i64,
    pub title: String,
    pub body: String,
}

/// Editable comment fields
#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Storage operations on comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment; a missing post is [`StoreError::MissingReference`]
    async fn create(&self, comment: NewComment) -> StoreResult<i64>;

    async fn get(&self, id: i64) -> StoreResult<CommentRecord>;

    async fn list(&self) -> StoreResult<Vec<CommentRecord>>;

    async fn list_by_post(&self, post_id: i64) -> StoreResult<Vec<CommentRecord>>;

    /// Update a comment only if `owner_id` owns it
    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: CommentChanges,
    ) -> StoreResult<CommentRecord>;

    /// Delete a comment only if `owner_id` owns it
    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<()>;
}

/// PostgreSQL comment repository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: NewComment) -> StoreResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (user_id, post_id, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(comment.user_id)
        .bind(comment.post_id)
        .bind(&comment.title)
        .bind(&comment.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> StoreResult<CommentRecord> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, user_id, post_id, title, body, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        comment.ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<CommentRecord>> {
        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, user_id, post_id, title, body, created_at
            FROM comments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list_by_post(&self, post_id: i64) -> StoreResult<Vec<CommentRecord>> {
        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, user_id, post_id, title, body, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: CommentChanges,
    ) -> StoreResult<CommentRecord> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            UPDATE comments SET
                title = COALESCE($3, title),
                body = COALESCE($4, body)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, post_id, title, body, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.body)
        .fetch_optional(&self.pool)
        .await?;

        comment.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
