//! Time-stamped values that go stale after a fixed age.

use crate::{Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;

/// A stored value plus the time it was written.
///
/// The value's fields are flattened next to `timestamp`, so a cart stores
/// as `{"items": [...], "timestamp": 1700000000000}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expiring<T> {
    #[serde(flatten)]
    pub value: T,
    /// Epoch milliseconds of the write.
    pub timestamp: i64,
}

impl<T> Expiring<T> {
    /// Check whether the value is older than `ttl_ms` at `now_ms`.
    pub fn is_expired(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.timestamp) > ttl_ms
    }
}

/// A single cache key holding an [`Expiring`] value.
///
/// # Example
///
/// ```rust,ignore
/// let slot = ExpiringSlot::<Cart>::new(cache, "suko.cart", 24 * 60 * 60 * 1000);
/// slot.save(&cart, clock.now_ms())?;
/// let restored = slot.load(clock.now_ms())?;
/// ```
#[derive(Debug, Clone)]
pub struct ExpiringSlot<T> {
    cache: Cache,
    key: String,
    ttl_ms: i64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> ExpiringSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(cache: Cache, key: impl Into<String>, ttl_ms: i64) -> Self {
        Self {
            cache,
            key: key.into(),
            ttl_ms,
            _phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Write `value` stamped with `now_ms`.
    pub fn save(&self, value: &T, now_ms: i64) -> Result<(), CacheError> {
        self.cache.set(
            &self.key,
            &Expiring {
                value,
                timestamp: now_ms,
            },
        )
    }

    /// Read the value if present and fresh.
    ///
    /// Expired and unparsable payloads are erased. Expiry yields `Ok(None)`;
    /// an unparsable payload yields the parse error (see
    /// [`CacheError::is_corrupt`]) so callers can log it.
    pub fn load(&self, now_ms: i64) -> Result<Option<T>, CacheError> {
        match self.cache.get::<Expiring<T>>(&self.key) {
            Ok(Some(stored)) if stored.is_expired(now_ms, self.ttl_ms) => {
                self.cache.delete(&self.key)?;
                Ok(None)
            }
            Ok(Some(stored)) => Ok(Some(stored.value)),
            Ok(None) => Ok(None),
            Err(e) if e.is_corrupt() => {
                self.cache.delete(&self.key)?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Erase the stored value.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(&self.key)
    }
}
