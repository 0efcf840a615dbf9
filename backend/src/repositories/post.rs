//! Post repository for database operations

use super::{StoreError, StoreResult};
use async_trait::async_trait;
use blog_shared::types::PostResponse;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Post record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<PostRecord> for PostResponse {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
            created_at: post.created_at,
        }
    }
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

/// Editable post fields; the owner is not one of them
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Storage operations on posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> StoreResult<i64>;

    async fn get(&self, id: i64) -> StoreResult<PostRecord>;

    async fn list(&self) -> StoreResult<Vec<PostRecord>>;

    /// Update a post only if `owner_id` owns it
    async fn update(&self, id: i64, owner_id: i64, changes: PostChanges) -> StoreResult<PostRecord>;

    /// Delete a post only if `owner_id` owns it
    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<()>;
}

/// PostgreSQL post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: NewPost) -> StoreResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (user_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> StoreResult<PostRecord> {
        let post = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, user_id, title, body, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        post.ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, user_id, title, body, created_at
            FROM posts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn update(&self, id: i64, owner_id: i64, changes: PostChanges) -> StoreResult<PostRecord> {
        let post = sqlx::query_as::<_, PostRecord>(
            r#"
            UPDATE posts SET
                title = COALESCE($3, title),
                body = COALESCE($4, body)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, body, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.body)
        .fetch_optional(&self.pool)
        .await?;

        post.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
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
