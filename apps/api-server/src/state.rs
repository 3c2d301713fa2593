//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    ObjectStore, PasswordService, PostRepository, TokenService, UserRepository,
};
use quill_infra::auth::{Argon2PasswordService, JwtTokenService};
use quill_infra::memory::{InMemoryPostRepository, InMemoryUserRepository};
use quill_infra::storage::InMemoryObjectStore;

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository};

#[cfg(feature = "s3")]
use quill_infra::storage::S3ObjectStore;

use crate::config::AppConfig;
use crate::middleware::upload::UploadPolicy;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub store: Arc<dyn ObjectStore>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub uploads: UploadPolicy,
    /// "postgres" or "memory", reported by the health endpoint.
    pub database_mode: &'static str,
}

type Repositories = (
    Arc<dyn UserRepository>,
    Arc<dyn PostRepository>,
    &'static str,
);

fn in_memory_repositories() -> Repositories {
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new(users.clone()));
    (users, posts, "memory")
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        let (users, posts, database_mode) = if let Some(db_config) = &config.database {
            match quill_infra::database::connect(db_config).await {
                Ok(conn) => {
                    let users: Arc<dyn UserRepository> =
                        Arc::new(PostgresUserRepository::new(conn.clone()));
                    let posts: Arc<dyn PostRepository> =
                        Arc::new(PostgresPostRepository::new(conn));
                    (users, posts, "postgres")
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_repositories()
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            in_memory_repositories()
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts, database_mode) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            in_memory_repositories()
        };

        #[cfg(feature = "s3")]
        let store: Arc<dyn ObjectStore> = if let Some(s3_config) = &config.s3 {
            match S3ObjectStore::new(s3_config.clone()).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!(
                        "Failed to initialize S3 store: {}. Using in-memory fallback.",
                        e
                    );
                    Arc::new(InMemoryObjectStore::new())
                }
            }
        } else {
            tracing::warn!("S3_BUCKET not set. Uploads will be held in memory only.");
            Arc::new(InMemoryObjectStore::new())
        };

        #[cfg(not(feature = "s3"))]
        let store: Arc<dyn ObjectStore> = {
            tracing::info!("Running without s3 feature - using in-memory object store");
            Arc::new(InMemoryObjectStore::new())
        };

        tracing::info!(database_mode, "Application state initialized");

        Self {
            users,
            posts,
            store,
            tokens,
            passwords,
            uploads: config.uploads.clone(),
            database_mode,
        }
    }
}
