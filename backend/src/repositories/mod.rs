//! Database repositories
//!
//! Provides the data access layer. Each entity has a small storage trait
//! with a PostgreSQL implementation and an in-memory implementation
//! ([`MemoryStore`]) used by tests and local runs.
//!
//! Ownership-scoped writes take the owner id alongside the resource id and
//! apply both in a single filter; a write that matches nothing reports
//! [`StoreError::NotFound`].

pub mod comment;
pub mod memory;
pub mod post;
pub mod user;

use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

pub use comment::{CommentChanges, CommentRecord, CommentRepository, NewComment, PgCommentRepository};
pub use memory::MemoryStore;
pub use post::{NewPost, PgPostRepository, PostChanges, PostRecord, PostRepository};
pub use user::{NewUser, PgUserRepository, UserChanges, UserRecord, UserRepository};

/// Storage failure, independent of the backing store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row matched the filter (including id + owner filters)
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist
    #[error("referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::MissingReference(db.constraint().unwrap_or("foreign key").to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// All repositories behind one handle
///
/// Cloning is cheap: each repository is an `Arc`.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Store {
    /// Repositories backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool)),
        }
    }

    /// Repositories sharing a single in-memory store
    pub fn in_memory() -> Self {
        let memory = MemoryStore::default();
        Self {
            users: Arc::new(memory.clone()),
            posts: Arc::new(memory.clone()),
            comments: Arc::new(memory),
        }
    }
}
