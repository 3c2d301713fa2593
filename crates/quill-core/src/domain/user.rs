use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Minimum username length, counted in characters after trimming.
pub const MIN_USERNAME_LEN: usize = 4;

/// Minimum password length before hashing.
pub const MIN_PASSWORD_LEN: usize = 6;

/// User entity - an author account. Created at registration, never
/// updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl User {
    /// Create a new user with a generated ID.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
        }
    }

    /// Validate registration/login credentials before they touch the
    /// password hasher or the repository.
    pub fn validate_credentials(username: &str, password: &str) -> Result<(), DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(DomainError::Validation(format!(
                "Username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_credentials() {
        assert!(User::validate_credentials("alice", "secret1").is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(User::validate_credentials("", "secret1").is_err());
        assert!(User::validate_credentials("alice", "").is_err());
        assert!(User::validate_credentials("   ", "secret1").is_err());
    }

    #[test]
    fn rejects_short_username() {
        assert!(User::validate_credentials("abc", "secret1").is_err());
        assert!(User::validate_credentials("abcd", "secret1").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        assert!(User::validate_credentials("alice", "12345").is_err());
        assert!(User::validate_credentials("alice", "123456").is_ok());
    }
}
