//! Error types shared across the domain and its ports.

use thiserror::Error;
use uuid::Uuid;

/// Business-rule failures. The HTTP layer maps these onto status codes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

/// Failures surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("record not found")]
    NotFound,

    /// A unique or foreign-key constraint fired; the message is safe to
    /// show to clients.
    #[error("{0}")]
    Constraint(String),
}
