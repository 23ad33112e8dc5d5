//! A database that is never reachable.

use crate::{DbError, DbPath, Feed, RealtimeDatabase};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Every operation fails with [`DbError::Unavailable`]; feeds yield that
/// error once and end.
///
/// Used when no connection is configured, and to exercise fallback
/// behaviour.
#[derive(Debug, Clone)]
pub struct OfflineDatabase {
    reason: String,
}

impl Default for OfflineDatabase {
    fn default() -> Self {
        Self::new("offline")
    }
}

impl OfflineDatabase {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> DbError {
        DbError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl RealtimeDatabase for OfflineDatabase {
    async fn get(&self, _path: &DbPath) -> Result<Option<Value>, DbError> {
        Err(self.error())
    }

    async fn push(&self, _path: &DbPath, _value: Value) -> Result<String, DbError> {
        Err(self.error())
    }

    async fn set(&self, _path: &DbPath, _value: Value) -> Result<(), DbError> {
        Err(self.error())
    }

    async fn update(&self, _path: &DbPath, _fields: Map<String, Value>) -> Result<(), DbError> {
        Err(self.error())
    }

    fn subscribe(&self, _path: &DbPath) -> Feed {
        Box::pin(futures::stream::once(futures::future::ready(Err(self.error()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_everything_fails() {
        let db = OfflineDatabase::new("no connection");
        let path = DbPath::parse("products").unwrap();

        assert_eq!(
            db.get(&path).await,
            Err(DbError::Unavailable("no connection".into()))
        );
        assert!(db.push(&path, Value::Null).await.is_err());
        assert!(db.remove(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_feed_yields_one_error() {
        let db = OfflineDatabase::default();
        let items: Vec<_> = db.subscribe(&DbPath::root()).collect().await;
        assert_eq!(items, vec![Err(DbError::Unavailable("offline".into()))]);
    }
}
