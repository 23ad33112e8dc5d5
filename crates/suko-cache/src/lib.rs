//! Type-safe local key-value storage for SUKO.
//!
//! Provides a small, ergonomic API over a pluggable byte store with
//! automatic JSON serialization. Two backends ship with the crate: an
//! in-memory map and a directory with one file per key.
//!
//! # Example
//!
//! ```rust
//! use suko_cache::{Cache, ExpiringSlot};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
//! struct Cart {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::memory();
//!
//! // Plain values
//! cache.set("theme", &"dark").unwrap();
//! let theme: Option<String> = cache.get("theme").unwrap();
//! assert_eq!(theme.as_deref(), Some("dark"));
//!
//! // Values that go stale after a day
//! let slot = ExpiringSlot::<Cart>::new(cache.clone(), "suko.cart", 24 * 60 * 60 * 1000);
//! slot.save(&Cart { items: vec!["tee".into()] }, 0).unwrap();
//! assert!(slot.load(1_000).unwrap().is_some());
//! assert!(slot.load(25 * 60 * 60 * 1000).unwrap().is_none());
//! ```

mod error;
mod expiring;
mod kv;
mod storage;

pub use error::CacheError;
pub use expiring::{Expiring, ExpiringSlot};
pub use kv::Cache;
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, ExpiringSlot, Storage};
}
