//! Admin authentication for SUKO.
//!
//! Provides the admin identity, pluggable credential verification and the
//! locally persisted sign-in.

mod error;
mod identity;
mod user;
mod verifier;

pub use error::AuthError;
pub use identity::{IdentitySlot, IDENTITY_KEY};
pub use user::AdminUser;
pub use verifier::{
    CredentialVerifier, Credentials, MockCredentials, MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD,
    MOCK_ADMIN_UID,
};
