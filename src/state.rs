//! Shared application state for all routes.

use crate::config::AppConfig;
use crate::external::{ImageLookup, PasswordHasher, Sha256Hasher, WikipediaImages};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub images: Arc<dyn ImageLookup>,
}

impl AppState {
    /// State with the default collaborators: iterated SHA-256 hashing and Wikipedia images.
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let hasher = Arc::new(Sha256Hasher::new(config.password_hash_rounds));
        let images = Arc::new(WikipediaImages::new(config.image_api_url.clone()));
        Self::with_collaborators(pool, config, hasher, images)
    }

    pub fn with_collaborators(
        pool: PgPool,
        config: AppConfig,
        hasher: Arc<dyn PasswordHasher>,
        images: Arc<dyn ImageLookup>,
    ) -> Self {
        AppState {
            pool,
            config: Arc::new(config),
            hasher,
            images,
        }
    }

    /// PostgreSQL schema holding the application tables.
    pub fn db_schema(&self) -> &str {
        &self.config.db_schema
    }
}
