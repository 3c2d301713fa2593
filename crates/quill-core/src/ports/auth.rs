//! Authentication ports.

use uuid::Uuid;

/// Claims carried by a verified token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub author_id: Uuid,
    pub username: String,
    pub exp: i64,
}

/// Token service trait for signed-credential issue/verify.
pub trait TokenService: Send + Sync {
    /// Issue a signed token asserting a user's identity.
    fn generate_token(&self, author_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Verify signature and expiry, returning the decoded claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token is missing")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    Hashing(String),
}
