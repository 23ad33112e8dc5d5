//! Credential verification.

use crate::{AdminUser, AuthError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Development admin email accepted by [`MockCredentials::default`].
pub const MOCK_ADMIN_EMAIL: &str = "admin@suko.com";
/// Development admin password accepted by [`MockCredentials::default`].
pub const MOCK_ADMIN_PASSWORD: &str = "admin123";
/// Identifier of the development admin.
pub const MOCK_ADMIN_UID: &str = "mock-admin-uid";

/// Email and password as typed into the login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject a blank email or password before contacting the verifier.
    pub fn ensure_present(&self) -> Result<(), AuthError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(())
    }
}

/// Checks an email/password pair and resolves the admin identity.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the admin for valid credentials, or
    /// [`AuthError::InvalidCredentials`].
    async fn verify(&self, email: &str, password: &str) -> Result<AdminUser, AuthError>;
}

/// A single hardcoded email/password pair, for development.
#[derive(Debug, Clone)]
pub struct MockCredentials {
    email: String,
    password: String,
}

impl Default for MockCredentials {
    fn default() -> Self {
        Self::new(MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD)
    }
}

impl MockCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for MockCredentials {
    async fn verify(&self, email: &str, password: &str) -> Result<AdminUser, AuthError> {
        if email == self.email && password == self.password {
            Ok(AdminUser::new(MOCK_ADMIN_UID, email).with_display_name("Admin"))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_accepts_default_pair() {
        let user = MockCredentials::default()
            .verify("admin@suko.com", "admin123")
            .await
            .unwrap();
        assert_eq!(user.uid.as_str(), "mock-admin-uid");
        assert_eq!(user.email, "admin@suko.com");
        assert_eq!(user.display_name.as_deref(), Some("Admin"));
    }

    #[tokio::test]
    async fn test_mock_rejects_everything_else() {
        let verifier = MockCredentials::default();
        for (email, password) in [
            ("admin@suko.com", "wrong"),
            ("ADMIN@suko.com", "admin123"),
            ("", ""),
        ] {
            assert!(matches!(
                verifier.verify(email, password).await,
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_custom_pair() {
        let verifier = MockCredentials::new("ops@suko.com", "s3cret");
        assert!(verifier.verify("ops@suko.com", "s3cret").await.is_ok());
        assert!(verifier.verify("admin@suko.com", "admin123").await.is_err());
    }

    #[test]
    fn test_ensure_present() {
        assert!(Credentials::new("a@b.dk", "pw").ensure_present().is_ok());
        assert!(matches!(
            Credentials::new("a@b.dk", "").ensure_present(),
            Err(AuthError::MissingCredentials)
        ));
        assert!(Credentials::default().ensure_present().is_err());
    }
}
