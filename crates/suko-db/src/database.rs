//! The realtime database abstraction.

use crate::{DbError, DbPath};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{Map, Value};

/// A live feed of the value at one path.
///
/// Yields the current value first, then a new item whenever it changes.
/// `Ok(None)` means nothing is stored at the path. An `Err` item reports a
/// failure of the feed; implementations end the feed after it.
pub type Feed = BoxStream<'static, Result<Option<Value>, DbError>>;

/// A hosted JSON tree with live change feeds.
///
/// The tree never holds `null`: writing `null` removes the node.
#[async_trait]
pub trait RealtimeDatabase: Send + Sync {
    /// Read the value at `path` once.
    async fn get(&self, path: &DbPath) -> Result<Option<Value>, DbError>;

    /// Store `value` under a new, time-ordered child key of `path` and
    /// return the key.
    async fn push(&self, path: &DbPath, value: Value) -> Result<String, DbError>;

    /// Replace the value at `path`. `null` removes it.
    async fn set(&self, path: &DbPath, value: Value) -> Result<(), DbError>;

    /// Shallow merge: each field replaces the child of the same name, and a
    /// `null` field removes that child. Field names may be relative paths.
    async fn update(&self, path: &DbPath, fields: Map<String, Value>) -> Result<(), DbError>;

    /// Remove the value at `path`.
    async fn remove(&self, path: &DbPath) -> Result<(), DbError> {
        self.set(path, Value::Null).await
    }

    /// Subscribe to the value at `path`.
    fn subscribe(&self, path: &DbPath) -> Feed;
}
