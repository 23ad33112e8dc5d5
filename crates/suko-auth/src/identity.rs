//! Locally persisted sign-in.

use crate::{AdminUser, AuthError};
use suko_cache::{Cache, CacheError};

/// Storage key of the persisted admin.
pub const IDENTITY_KEY: &str = "adminUser";

/// The admin identity remembered between runs, stored as plain JSON.
#[derive(Debug, Clone)]
pub struct IdentitySlot {
    cache: Cache,
}

impl IdentitySlot {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// The remembered admin, if any.
    ///
    /// Returns the parse error for an unreadable payload so the caller can
    /// treat it as signed out; see [`CacheError::is_corrupt`].
    pub fn load(&self) -> Result<Option<AdminUser>, CacheError> {
        self.cache.get(IDENTITY_KEY)
    }

    pub fn save(&self, user: &AdminUser) -> Result<(), AuthError> {
        Ok(self.cache.set(IDENTITY_KEY, user)?)
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        Ok(self.cache.delete(IDENTITY_KEY)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let cache = Cache::memory();
        let slot = IdentitySlot::new(cache.clone());
        assert_eq!(slot.load().unwrap(), None);

        let user = AdminUser::new("mock-admin-uid", "admin@suko.com");
        slot.save(&user).unwrap();
        assert_eq!(slot.load().unwrap(), Some(user));
        assert!(cache.exists("adminUser").unwrap());

        slot.clear().unwrap();
        assert_eq!(slot.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_payload() {
        let cache = Cache::memory();
        cache.set(IDENTITY_KEY, &"{not an admin").unwrap();
        let err = IdentitySlot::new(cache).load().unwrap_err();
        assert!(err.is_corrupt());
    }
}
