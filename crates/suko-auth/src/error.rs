//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email or password left blank.
    #[error("Please enter both email and password")]
    MissingCredentials,

    /// An admin-only operation was attempted while signed out.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The verification backend failed.
    #[error("verifier unavailable: {0}")]
    Unavailable(String),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] suko_cache::CacheError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::MissingCredentials
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::NotAuthenticated)
    }
}
