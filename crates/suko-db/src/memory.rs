//! In-process realtime database.

use crate::tree::{get_at, set_at};
use crate::{DbError, DbPath, Feed, PushIdGenerator, RealtimeDatabase};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// A realtime database held in memory.
///
/// The whole tree lives in a `watch` channel; every feed owns a receiver
/// and re-reads its path when the tree changes. Clones share the tree.
#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    tree: watch::Sender<Value>,
    push_ids: PushIdGenerator,
    read_only: AtomicBool,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDatabase {
    /// An empty database.
    pub fn new() -> Self {
        Self::with_tree(Value::Null)
    }

    /// A database preloaded with `tree`.
    pub fn with_tree(tree: Value) -> Self {
        let (sender, _) = watch::channel(crate::tree::normalize(tree));
        Self {
            inner: Arc::new(Inner {
                tree: sender,
                push_ids: PushIdGenerator::new(),
                read_only: AtomicBool::new(false),
            }),
        }
    }

    /// Reject every write with [`DbError::PermissionDenied`] while set.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.inner.tree.borrow().clone()
    }

    /// Number of live feeds.
    pub fn subscriber_count(&self) -> usize {
        self.inner.tree.receiver_count()
    }

    fn check_writable(&self, path: &DbPath) -> Result<(), DbError> {
        if self.inner.read_only.load(Ordering::SeqCst) {
            return Err(DbError::PermissionDenied(path.to_string()));
        }
        Ok(())
    }

    fn write(&self, path: &DbPath, value: Value) {
        let changed = self
            .inner
            .tree
            .send_if_modified(|tree| set_at(tree, path.segments(), value));
        if changed {
            tracing::trace!(path = %path, "tree changed");
        }
    }
}

#[async_trait]
impl RealtimeDatabase for MemoryDatabase {
    async fn get(&self, path: &DbPath) -> Result<Option<Value>, DbError> {
        Ok(get_at(&self.inner.tree.borrow(), path.segments()).cloned())
    }

    async fn push(&self, path: &DbPath, value: Value) -> Result<String, DbError> {
        self.check_writable(path)?;
        let key = self.inner.push_ids.next_id();
        let child = path.child(&key)?;
        self.write(&child, value);
        Ok(key)
    }

    async fn set(&self, path: &DbPath, value: Value) -> Result<(), DbError> {
        self.check_writable(path)?;
        self.write(path, value);
        Ok(())
    }

    async fn update(&self, path: &DbPath, fields: Map<String, Value>) -> Result<(), DbError> {
        self.check_writable(path)?;
        let targets = fields
            .into_iter()
            .map(|(field, value)| path.join(&field).map(|p| (p, value)))
            .collect::<Result<Vec<_>, _>>()?;

        // All fields land in one tree change, so feeds see a single update.
        self.inner.tree.send_if_modified(|tree| {
            targets
                .into_iter()
                .fold(false, |changed, (target, value)| {
                    set_at(tree, target.segments(), value) || changed
                })
        });
        Ok(())
    }

    fn subscribe(&self, path: &DbPath) -> Feed {
        let receiver = self.inner.tree.subscribe();
        let segments = path.segments().to_vec();

        let stream = futures::stream::unfold(
            (receiver, segments, None::<Option<Value>>),
            |(mut receiver, segments, last)| async move {
                let mut first = last.is_none();
                loop {
                    if !first && receiver.changed().await.is_err() {
                        return None;
                    }
                    first = false;
                    let current = get_at(&receiver.borrow_and_update(), &segments).cloned();
                    if last.as_ref() == Some(&current) {
                        continue;
                    }
                    return Some((Ok(current.clone()), (receiver, segments, Some(current))));
                }
            },
        );
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    fn path(p: &str) -> DbPath {
        DbPath::parse(p).unwrap()
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let db = MemoryDatabase::new();
        db.set(&path("products/a"), json!({"name": "Tee"})).await.unwrap();
        assert_eq!(
            db.get(&path("products/a/name")).await.unwrap(),
            Some(json!("Tee"))
        );

        db.remove(&path("products/a")).await.unwrap();
        assert_eq!(db.get(&path("products")).await.unwrap(), None);
        assert_eq!(db.snapshot(), Value::Null);
    }

    #[tokio::test]
    async fn test_push_keys_are_ordered() {
        let db = MemoryDatabase::new();
        let first = db.push(&path("products"), json!({"n": 1})).await.unwrap();
        let second = db.push(&path("products"), json!({"n": 2})).await.unwrap();
        assert!(first < second);

        let products = db.get(&path("products")).await.unwrap().unwrap();
        assert_eq!(products[&first]["n"], 1);
        assert_eq!(products[&second]["n"], 2);
    }

    #[tokio::test]
    async fn test_update_is_shallow_merge() {
        let db = MemoryDatabase::with_tree(json!({
            "products": {"a": {"name": "Tee", "price": 48, "featured": true}}
        }));
        let mut fields = Map::new();
        fields.insert("price".into(), json!(40));
        fields.insert("featured".into(), Value::Null);
        fields.insert("sizes".into(), json!(["M"]));
        db.update(&path("products/a"), fields).await.unwrap();

        assert_eq!(
            db.get(&path("products/a")).await.unwrap(),
            Some(json!({"name": "Tee", "price": 40, "sizes": ["M"]}))
        );
    }

    #[tokio::test]
    async fn test_update_rejects_bad_field_names() {
        let db = MemoryDatabase::new();
        let mut fields = Map::new();
        fields.insert("bad.name".into(), json!(1));
        assert!(matches!(
            db.update(&path("products/a"), fields).await,
            Err(DbError::InvalidPath { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let db = MemoryDatabase::new();
        db.set_read_only(true);
        assert!(matches!(
            db.push(&path("products"), json!(1)).await,
            Err(DbError::PermissionDenied(_))
        ));
        assert!(db.set(&path("a"), json!(1)).await.is_err());

        db.set_read_only(false);
        assert!(db.set(&path("a"), json!(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_feed_emits_current_then_changes() {
        let db = MemoryDatabase::with_tree(json!({"products": {"a": {"name": "Tee"}}}));
        let mut feed = db.subscribe(&path("products"));

        assert_eq!(
            feed.next().await,
            Some(Ok(Some(json!({"a": {"name": "Tee"}}))))
        );

        db.set(&path("products/b"), json!({"name": "Cap"})).await.unwrap();
        let next = feed.next().await.unwrap().unwrap().unwrap();
        assert_eq!(next["b"]["name"], "Cap");

        db.remove(&path("products")).await.unwrap();
        assert_eq!(feed.next().await, Some(Ok(None)));
    }

    #[tokio::test]
    async fn test_feed_ignores_unrelated_changes() {
        let db = MemoryDatabase::new();
        let mut feed = db.subscribe(&path("products"));
        assert_eq!(feed.next().await, Some(Ok(None)));

        db.set(&path("settings/theme"), json!("dark")).await.unwrap();
        db.set(&path("products/a"), json!(1)).await.unwrap();
        assert_eq!(feed.next().await, Some(Ok(Some(json!({"a": 1})))));
    }

    #[tokio::test]
    async fn test_feed_ends_when_database_dropped() {
        let db = MemoryDatabase::new();
        let mut feed = db.subscribe(&path("products"));
        assert_eq!(db.subscriber_count(), 1);
        assert_eq!(feed.next().await, Some(Ok(None)));

        drop(db);
        assert_eq!(feed.next().await, None);
    }
}
