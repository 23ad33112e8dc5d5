//! Typed facade over a realtime database.

use crate::{DbError, DbPath, Feed, RealtimeDatabase};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a realtime database with string paths and automatic
/// JSON (de)serialization.
///
/// # Example
///
/// ```rust,ignore
/// let db = Db::new(MemoryDatabase::new());
/// db.set_as("settings/currency", &"EUR").await?;
/// let currency: Option<String> = db.get_as("settings/currency").await?;
/// ```
#[derive(Clone)]
pub struct Db {
    inner: Arc<dyn RealtimeDatabase>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

impl Db {
    pub fn new(database: impl RealtimeDatabase + 'static) -> Self {
        Self {
            inner: Arc::new(database),
        }
    }

    pub fn from_arc(database: Arc<dyn RealtimeDatabase>) -> Self {
        Self { inner: database }
    }

    /// The underlying database.
    pub fn raw(&self) -> &Arc<dyn RealtimeDatabase> {
        &self.inner
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>, DbError> {
        self.inner.get(&DbPath::parse(path)?).await
    }

    /// Read and deserialize the value at `path`.
    pub async fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, DbError> {
        match self.get(path).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` and push it as a new child of `path`.
    pub async fn push<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<String, DbError> {
        let value = serde_json::to_value(value)?;
        self.inner.push(&DbPath::parse(path)?, value).await
    }

    /// Serialize `value` and store it at `path`.
    pub async fn set_as<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<(), DbError> {
        let value = serde_json::to_value(value)?;
        self.inner.set(&DbPath::parse(path)?, value).await
    }

    pub async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), DbError> {
        self.inner.update(&DbPath::parse(path)?, fields).await
    }

    pub async fn remove(&self, path: &str) -> Result<(), DbError> {
        self.inner.remove(&DbPath::parse(path)?).await
    }

    pub fn subscribe(&self, path: &str) -> Result<Feed, DbError> {
        Ok(self.inner.subscribe(&DbPath::parse(path)?))
    }
}
