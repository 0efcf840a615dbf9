//! In-memory repositories
//!
//! Mirrors the relational schema closely enough for the services to be
//! exercised without PostgreSQL: unique emails, foreign keys, cascading
//! deletes and owner-filtered writes.

use super::{
    CommentChanges, CommentRecord, CommentRepository, NewComment, NewPost, NewUser, PostChanges,
    PostRecord, PostRepository, StoreError, StoreResult, UserChanges, UserRecord, UserRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, UserRecord>,
    posts: BTreeMap<i64, PostRecord>,
    comments: BTreeMap<i64, CommentRecord>,
    last_user_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Shared in-memory store implementing every repository trait
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        tables.last_user_id += 1;
        let id = tables.last_user_id;
        tables.users.insert(
            id,
            UserRecord {
                id,
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<UserRecord> {
        let tables = self.tables.read().await;
        tables.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<UserRecord> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<UserRecord> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict("users_email_key".to_string()));
            }
        }

        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }

        tables.posts.retain(|_, p| p.user_id != id);
        let Tables { posts, comments, .. } = &mut *tables;
        comments.retain(|_, c| c.user_id != id && posts.contains_key(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: NewPost) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.user_id) {
            return Err(StoreError::MissingReference("posts_user_id_fkey".to_string()));
        }

        tables.last_post_id += 1;
        let id = tables.last_post_id;
        tables.posts.insert(
            id,
            PostRecord {
                id,
                user_id: post.user_id,
                title: post.title,
                body: post.body,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: i64) -> StoreResult<PostRecord> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<PostRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().cloned().collect())
    }

    async fn update(&self, id: i64, owner_id: i64, changes: PostChanges) -> StoreResult<PostRecord> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .filter(|p| p.user_id == owner_id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(body) = changes.body {
            post.body = body;
        }
        Ok(post.clone())
    }

    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.posts.get(&id) {
            Some(p) if p.user_id == owner_id => {}
            _ => return Err(StoreError::NotFound),
        }

        tables.posts.remove(&id);
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: NewComment) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&comment.user_id) {
            return Err(StoreError::MissingReference("comments_user_id_fkey".to_string()));
        }
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StoreError::MissingReference("comments_post_id_fkey".to_string()));
        }

        tables.last_comment_id += 1;
        let id = tables.last_comment_id;
        tables.comments.insert(
            id,
            CommentRecord {
                id,
                user_id: comment.user_id,
                post_id: comment.post_id,
                title: comment.title,
                body: comment.body,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: i64) -> StoreResult<CommentRecord> {
        let tables = self.tables.read().await;
        tables.comments.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> StoreResult<Vec<CommentRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.values().cloned().collect())
    }

    async fn list_by_post(&self, post_id: i64) -> StoreResult<Vec<CommentRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: CommentChanges,
    ) -> StoreResult<CommentRecord> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .get_mut(&id)
            .filter(|c| c.user_id == owner_id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = changes.title {
            comment.title = title;
        }
        if let Some(body) = changes.body {
            comment.body = body;
        }
        Ok(comment.clone())
    }

    async fn delete(&self, id: i64, owner_id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.comments.get(&id) {
            Some(c) if c.user_id == owner_id => {}
            _ => return Err(StoreError::NotFound),
        }

        tables.comments.remove(&id);
        Ok(())
    }
}
