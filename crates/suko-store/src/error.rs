//! Store error types.

use suko_auth::AuthError;
use suko_cache::CacheError;
use suko_commerce::CommerceError;
use suko_db::DbError;
use thiserror::Error;

/// Errors surfaced by the runtime stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Domain rule violated (bad quantity, incomplete checkout, ...).
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Realtime store operation failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Local storage failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Sign-in or authorization failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A payment is already being processed.
    #[error("Checkout already in progress")]
    CheckoutInProgress,
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Database(DbError::from(e))
    }
}

impl StoreError {
    /// Failures caused by the caller's input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::Commerce(_)
                | StoreError::Auth(AuthError::InvalidCredentials)
                | StoreError::Auth(AuthError::MissingCredentials)
        )
    }

    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, StoreError::Auth(AuthError::NotAuthenticated))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
