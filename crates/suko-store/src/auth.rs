//! Admin sign-in state.

use crate::navigation::Route;
use crate::observable::{Observable, Subscription};
use std::sync::Arc;
use suko_auth::{AdminUser, AuthError, CredentialVerifier, Credentials, IdentitySlot};
use suko_cache::Cache;

/// Tracks the signed-in admin and gates admin-only routes.
///
/// The identity is remembered in local storage so a restart keeps the
/// admin signed in.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn CredentialVerifier>,
    identity: IdentitySlot,
    user: Observable<Option<AdminUser>>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("user", &self.user.get())
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Create the gate, restoring a remembered identity from `cache`.
    pub fn new(verifier: Arc<dyn CredentialVerifier>, cache: Cache) -> Self {
        let identity = IdentitySlot::new(cache);
        let restored = match identity.load() {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!(error = %e, "discarding unreadable admin identity");
                if let Err(e) = identity.clear() {
                    tracing::warn!(error = %e, "failed to erase admin identity");
                }
                None
            }
        };
        if let Some(user) = &restored {
            tracing::info!(uid = %user.uid, "admin session restored");
        }

        Self {
            verifier,
            identity,
            user: Observable::new(restored),
        }
    }

    /// Check credentials and sign in.
    ///
    /// Blank fields fail with [`AuthError::MissingCredentials`] before the
    /// verifier is asked. On any failure the current state is unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AuthError> {
        Credentials::new(email, password).ensure_present()?;

        let user = match self.verifier.verify(email, password).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(email, error = %e, "admin login failed");
                return Err(e);
            }
        };

        if let Err(e) = self.identity.save(&user) {
            tracing::warn!(error = %e, "failed to remember admin identity");
        }
        tracing::info!(uid = %user.uid, "admin logged in");
        self.user.set(Some(user.clone()));
        Ok(user)
    }

    pub fn logout(&self) {
        if let Err(e) = self.identity.clear() {
            tracing::warn!(error = %e, "failed to erase admin identity");
        }
        if self.user.get().is_some() {
            tracing::info!("admin logged out");
        }
        self.user.set(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.with(Option::is_some)
    }

    pub fn current_user(&self) -> Option<AdminUser> {
        self.user.get()
    }

    /// The signed-in admin, or [`AuthError::NotAuthenticated`].
    pub fn require(&self) -> Result<AdminUser, AuthError> {
        self.current_user().ok_or(AuthError::NotAuthenticated)
    }

    /// Redirect admin-only routes to the login page while signed out.
    pub fn guard(&self, route: Route) -> Route {
        if route.requires_admin() && !self.is_authenticated() {
            tracing::debug!(path = %route, "redirecting to admin login");
            Route::AdminLogin
        } else {
            route
        }
    }

    pub fn subscribe(&self) -> Subscription<Option<AdminUser>> {
        self.user.subscribe()
    }
}
