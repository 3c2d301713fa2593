//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains database, object storage, and authentication adapters.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory adapters only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `s3` - S3-compatible object storage via the AWS SDK
//!
//! The in-memory adapters are always compiled: they back the server when an
//! external collaborator is unconfigured, and they are the substrate for
//! handler-level tests.

pub mod auth;
pub mod database;
pub mod memory;
pub mod storage;

// Re-exports - authentication
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - in-memory adapters
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
pub use storage::InMemoryObjectStore;

// Re-exports - database
pub use database::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};

// Re-exports - object storage
pub use storage::S3Config;

#[cfg(feature = "s3")]
pub use storage::S3ObjectStore;
