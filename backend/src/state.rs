//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything in here is built once at startup and read-only afterwards:
//! the repositories, the configuration and the token service with its
//! signing keys.

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::repositories::Store;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// All fields are cheap to clone across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Repositories used by the services
    pub store: Store,
    /// Database pool when running against PostgreSQL
    pub db: Option<PgPool>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token service holding the signing keys
    pub tokens: TokenService,
}

impl AppState {
    /// Create state backed by PostgreSQL
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let mut state = Self::with_store(Store::postgres(db.clone()), config);
        state.db = Some(db);
        state
    }

    /// Create state over an arbitrary store (in-memory for tests)
    pub fn with_store(store: Store, config: AppConfig) -> Self {
        let tokens = TokenService::new(&config.jwt.secret, config.jwt.token_ttl_secs);

        Self {
            store,
            db: None,
            config: Arc::new(config),
            tokens,
        }
    }

    /// Get a reference to the repositories
    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get a reference to the database pool, if any
    #[inline]
    pub fn db(&self) -> Option<&PgPool> {
        self.db.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
