//! Realtime JSON-tree database layer for SUKO.
//!
//! The storefront keeps its catalog in a hosted realtime database: one JSON
//! tree addressed by `/`-separated key paths, with live change feeds. This
//! crate provides the [`RealtimeDatabase`] abstraction over such a store,
//! an in-memory implementation, an always-offline implementation, a typed
//! facade and the connection configuration.
//!
//! # Example
//!
//! ```rust
//! use futures::StreamExt;
//! use serde_json::json;
//! use suko_db::{Db, MemoryDatabase};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let db = Db::new(MemoryDatabase::new());
//!
//! let mut feed = db.subscribe("products").unwrap();
//! assert_eq!(feed.next().await.unwrap().unwrap(), None);
//!
//! let key = db.push("products", &json!({"name": "Tee", "price": 48})).await.unwrap();
//! let snapshot = feed.next().await.unwrap().unwrap().unwrap();
//! assert_eq!(snapshot[&key]["name"], "Tee");
//! # }
//! ```

mod config;
mod database;
mod error;
mod memory;
mod offline;
mod path;
mod push_id;
mod tree;
mod typed;

pub use config::{ConfigError, DatabaseConfig, DATABASE_URL_FALLBACK_VAR, ENV_VARS};
pub use database::{Feed, RealtimeDatabase};
pub use error::DbError;
pub use memory::MemoryDatabase;
pub use offline::OfflineDatabase;
pub use path::DbPath;
pub use push_id::PushIdGenerator;
pub use typed::Db;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Db, DbError, DbPath, Feed, MemoryDatabase, OfflineDatabase, RealtimeDatabase};
}
