//! Live product catalog.
//!
//! [`CatalogStore`] mirrors the `products` subtree of the realtime
//! database. A background task consumes the change feed and publishes each
//! snapshot; reads are synchronous against the latest one.
//!
//! The catalog is never left empty by a failure: a feed error publishes the
//! local placeholder products, and an empty database is seeded with them
//! once per store lifetime.

use crate::clock::Clock;
use crate::error::StoreResult;
use crate::observable::{Observable, Subscription};
use futures::StreamExt;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use suko_commerce::catalog::{
    local_placeholders, placeholder_products, CatalogStats, Product, ProductDraft, ProductPatch,
};
use suko_commerce::search::{apply_filters, Filter};
use suko_commerce::ProductId;
use suko_db::{Db, DbError, DbPath, Feed};
use tokio::task::JoinHandle;

/// Database path holding one child record per product.
pub const PRODUCTS_PATH: &str = "products";

/// Where the published products came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSource {
    /// No snapshot received yet.
    #[default]
    Loading,
    /// Last snapshot came from the database feed.
    Live,
    /// Local placeholder products, published after a failure.
    Placeholder,
}

fn product_path(id: &ProductId) -> Result<String, DbError> {
    Ok(DbPath::parse(PRODUCTS_PATH)?.child(id.as_str())?.to_string())
}

/// Decode a `products` snapshot, ordered by key. Unreadable records are
/// skipped.
fn parse_snapshot(value: Value) -> Vec<Product> {
    let Value::Object(records) = value else {
        tracing::warn!("catalog snapshot is not an object; treating as empty");
        return Vec::new();
    };

    let mut products: Vec<Product> = records
        .into_iter()
        .filter_map(|(key, record)| match Product::from_record(&key, record) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(product_id = %key, error = %e, "skipping unreadable product record");
                None
            }
        })
        .collect();
    products.sort_by(|a, b| a.id.cmp(&b.id));
    products
}

#[derive(Debug)]
struct CatalogInner {
    db: Db,
    clock: Arc<dyn Clock>,
    products: Observable<Vec<Product>>,
    source: Observable<CatalogSource>,
    seeded: AtomicBool,
}

impl CatalogInner {
    fn publish(&self, products: Vec<Product>, source: CatalogSource) {
        tracing::debug!(count = products.len(), source = ?source, "catalog snapshot published");
        self.products.set(products);
        self.source.set(source);
    }

    fn publish_placeholders(&self) {
        self.publish(local_placeholders(self.clock.now_ms()), CatalogSource::Placeholder);
    }

    async fn add(&self, draft: ProductDraft) -> StoreResult<ProductId> {
        let product = Product::from_draft(draft, self.clock.now_ms());
        let record = product.to_record()?;
        let key = self.db.push(PRODUCTS_PATH, &record).await?;
        tracing::info!(product_id = %key, name = %product.name, "product created");
        Ok(ProductId::new(key))
    }

    async fn seed_or_clear(&self) {
        if self.seeded.swap(true, Ordering::SeqCst) {
            self.publish(Vec::new(), CatalogSource::Live);
            return;
        }

        let drafts = placeholder_products();
        tracing::info!(count = drafts.len(), "catalog is empty; seeding placeholder products");
        for draft in drafts {
            if let Err(e) = self.add(draft).await {
                tracing::warn!(error = %e, "seeding failed; serving local placeholders");
                self.publish_placeholders();
                return;
            }
        }
    }

    async fn run_feed(self: Arc<Self>, mut feed: Feed) {
        let mut synced = false;
        while let Some(delivery) = feed.next().await {
            match delivery {
                Ok(snapshot) => {
                    let products = snapshot.map(parse_snapshot).unwrap_or_default();
                    if products.is_empty() {
                        self.seed_or_clear().await;
                        continue;
                    }
                    if !synced {
                        tracing::info!(count = products.len(), "catalog feed synced");
                        synced = true;
                    }
                    self.publish(products, CatalogSource::Live);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "catalog feed failed; serving local placeholders");
                    self.publish_placeholders();
                }
            }
        }
        tracing::debug!("catalog feed ended");
    }
}

/// The product catalog, kept in sync with the realtime database.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = CatalogStore::connect(Db::new(MemoryDatabase::new()), Arc::new(SystemClock));
/// let mut products = catalog.subscribe();
/// let seeded = products.wait_for(|p| p.len() == 4).await;
/// ```
#[derive(Debug)]
pub struct CatalogStore {
    inner: Arc<CatalogInner>,
    feed_task: Mutex<Option<JoinHandle<()>>>,
}

impl CatalogStore {
    /// Subscribe to the `products` feed on the current tokio runtime.
    ///
    /// Without a runtime, or when the feed cannot be opened, the local
    /// placeholders are published instead.
    pub fn connect(db: Db, clock: Arc<dyn Clock>) -> Self {
        let inner = Arc::new(CatalogInner {
            db,
            clock,
            products: Observable::new(Vec::new()),
            source: Observable::new(CatalogSource::Loading),
            seeded: AtomicBool::new(false),
        });

        let feed_task = match (
            tokio::runtime::Handle::try_current(),
            inner.db.subscribe(PRODUCTS_PATH),
        ) {
            (Ok(runtime), Ok(feed)) => Some(runtime.spawn(Arc::clone(&inner).run_feed(feed))),
            (Err(_), _) => {
                tracing::warn!("no async runtime; serving local placeholders");
                inner.publish_placeholders();
                None
            }
            (_, Err(e)) => {
                tracing::warn!(error = %e, "catalog feed unavailable; serving local placeholders");
                inner.publish_placeholders();
                None
            }
        };

        Self {
            inner,
            feed_task: Mutex::new(feed_task),
        }
    }

    /// Stop consuming the feed. The last snapshot stays readable.
    pub fn shutdown(&self) {
        let task = self
            .feed_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
            tracing::debug!("catalog feed stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.feed_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    // --- Writes ---

    /// Create a product; `createdAt` and `updatedAt` are set to now.
    pub async fn add(&self, draft: ProductDraft) -> StoreResult<ProductId> {
        self.inner.add(draft).await
    }

    /// Merge `patch` into a product and bump `updatedAt`.
    pub async fn update(&self, id: &ProductId, patch: ProductPatch) -> StoreResult<()> {
        let fields = patch.touched(self.inner.clock.now_ms()).to_fields()?;
        self.inner.db.update(&product_path(id)?, fields).await?;
        tracing::info!(product_id = %id, "product updated");
        Ok(())
    }

    /// Overwrite every editable field of a product with `draft`.
    ///
    /// Unlike [`update`](Self::update), optional fields missing from the
    /// draft are cleared. `createdAt` and per-color images are kept.
    pub async fn replace(&self, id: &ProductId, draft: ProductDraft) -> StoreResult<()> {
        let clears_description = draft.description.is_none();
        let clears_original_price = draft.original_price.is_none();

        let mut patch = ProductPatch::from(draft);
        patch.color_images = None;
        let mut fields = patch.touched(self.inner.clock.now_ms()).to_fields()?;
        if clears_description {
            fields.insert("description".into(), Value::Null);
        }
        if clears_original_price {
            fields.insert("originalPrice".into(), Value::Null);
        }

        self.inner.db.update(&product_path(id)?, fields).await?;
        tracing::info!(product_id = %id, "product replaced");
        Ok(())
    }

    pub async fn delete(&self, id: &ProductId) -> StoreResult<()> {
        self.inner.db.remove(&product_path(id)?).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    // --- Reads of the latest snapshot ---

    pub fn all(&self) -> Vec<Product> {
        self.inner.products.get()
    }

    pub fn len(&self) -> usize {
        self.inner.products.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_id(&self, id: &str) -> Option<Product> {
        self.find(|p| p.id.as_ref().is_some_and(|pid| pid.as_str() == id))
    }

    /// Look up a product by name or slug, case-insensitively. The input
    /// may be percent-encoded.
    pub fn get_by_name(&self, name_or_slug: &str) -> Option<Product> {
        self.find(|p| p.matches_name(name_or_slug))
    }

    pub fn featured(&self) -> Vec<Product> {
        self.select(|p| p.featured)
    }

    pub fn new_arrivals(&self) -> Vec<Product> {
        self.select(|p| p.new_arrival)
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.select(|p| p.category == category)
    }

    /// Products matching every filter.
    pub fn filter(&self, filters: &[Filter]) -> Vec<Product> {
        self.inner.products.with(|products| apply_filters(products, filters))
    }

    pub fn stats(&self) -> CatalogStats {
        self.inner.products.with(|products| CatalogStats::from_products(products))
    }

    pub fn source(&self) -> CatalogSource {
        self.inner.source.get()
    }

    pub fn subscribe(&self) -> Subscription<Vec<Product>> {
        self.inner.products.subscribe()
    }

    pub fn subscribe_source(&self) -> Subscription<CatalogSource> {
        self.inner.source.subscribe()
    }

    fn find(&self, predicate: impl Fn(&Product) -> bool) -> Option<Product> {
        self.inner
            .products
            .with(|products| products.iter().find(|p| predicate(p)).cloned())
    }

    fn select(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        self.inner
            .products
            .with(|products| products.iter().filter(|p| predicate(p)).cloned().collect())
    }
}

impl Drop for CatalogStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;
    use suko_commerce::catalog::PLACEHOLDER_ID_PREFIX;
    use suko_db::{MemoryDatabase, OfflineDatabase};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(1_700_000_000_000))
    }

    fn tee(name: &str) -> Value {
        json!({"name": name, "price": 48.0, "category": "tees", "featured": true})
    }

    async fn loaded(catalog: &CatalogStore, count: usize) -> Vec<Product> {
        let mut sub = catalog.subscribe();
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            sub.wait_for(|products| products.len() == count),
        )
        .await
        .expect("catalog did not load")
        .unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_is_ordered_by_key() {
        let db = MemoryDatabase::with_tree(json!({
            "products": {"b": tee("Beta"), "a": tee("Alpha"), "c": tee("Gamma")}
        }));
        let catalog = CatalogStore::connect(Db::new(db), clock());

        let products = loaded(&catalog, 3).await;
        let ids: Vec<&str> = products
            .iter()
            .map(|p| p.id.as_ref().unwrap().as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(catalog.source(), CatalogSource::Live);
    }

    #[tokio::test]
    async fn test_empty_database_is_seeded_once() {
        let db = MemoryDatabase::new();
        let catalog = CatalogStore::connect(Db::new(db.clone()), clock());

        let products = loaded(&catalog, 4).await;
        assert!(products.iter().all(|p| !p
            .id
            .as_ref()
            .unwrap()
            .as_str()
            .starts_with(PLACEHOLDER_ID_PREFIX)));
        assert_eq!(db.snapshot()["products"].as_object().unwrap().len(), 4);

        // Emptying the catalog later does not reseed.
        for product in products {
            catalog.delete(product.id.as_ref().unwrap()).await.unwrap();
        }
        loaded(&catalog, 0).await;
        assert!(db.snapshot().get("products").is_none());
    }

    #[tokio::test]
    async fn test_failed_seeding_publishes_placeholders() {
        let db = MemoryDatabase::new();
        db.set_read_only(true);
        let catalog = CatalogStore::connect(Db::new(db), clock());

        let mut source = catalog.subscribe_source();
        source.wait_for(|s| *s == CatalogSource::Placeholder).await;
        let ids: Vec<String> = catalog
            .all()
            .into_iter()
            .map(|p| p.id.unwrap().into_inner())
            .collect();
        assert_eq!(
            ids,
            vec!["placeholder-1", "placeholder-2", "placeholder-3", "placeholder-4"]
        );
    }

    #[tokio::test]
    async fn test_feed_error_publishes_placeholders() {
        let catalog = CatalogStore::connect(Db::new(OfflineDatabase::default()), clock());
        let products = loaded(&catalog, 4).await;
        assert_eq!(catalog.source(), CatalogSource::Placeholder);
        assert_eq!(products[0].id.as_ref().unwrap().as_str(), "placeholder-1");
    }

    #[tokio::test]
    async fn test_add_update_delete() {
        let db = MemoryDatabase::with_tree(json!({"products": {"a": tee("Alpha")}}));
        let catalog = CatalogStore::connect(Db::new(db.clone()), clock());
        loaded(&catalog, 1).await;

        let id = catalog
            .add(ProductDraft::new("Heavy Hoodie", 120.0, "sweats"))
            .await
            .unwrap();
        let products = loaded(&catalog, 2).await;
        let created = products.iter().find(|p| p.id.as_ref() == Some(&id)).unwrap();
        assert_eq!(created.created_at, 1_700_000_000_000);
        assert_eq!(created.updated_at, created.created_at);

        let patch = ProductPatch {
            price: Some(99.0),
            ..Default::default()
        };
        catalog.update(&id, patch).await.unwrap();
        let mut sub = catalog.subscribe();
        let updated = sub
            .wait_for(|products| products.iter().any(|p| p.price == 99.0))
            .await
            .unwrap();
        assert!(updated.iter().any(|p| p.name == "Heavy Hoodie" && p.price == 99.0));

        catalog.delete(&id).await.unwrap();
        loaded(&catalog, 1).await;
    }

    #[tokio::test]
    async fn test_replace_clears_optional_fields() {
        let db = MemoryDatabase::with_tree(json!({"products": {"a": {
            "name": "Alpha", "price": 48.0, "category": "tees",
            "description": "old", "originalPrice": 60.0, "createdAt": 5
        }}}));
        let catalog = CatalogStore::connect(Db::new(db.clone()), clock());
        loaded(&catalog, 1).await;

        catalog
            .replace(&ProductId::new("a"), ProductDraft::new("Alpha", 40.0, "tees"))
            .await
            .unwrap();
        let record = &db.snapshot()["products"]["a"];
        assert!(record.get("description").is_none());
        assert!(record.get("originalPrice").is_none());
        assert_eq!(record["createdAt"], 5);
        assert_eq!(record["price"], 40.0);
    }

    #[tokio::test]
    async fn test_write_errors_propagate() {
        let db = MemoryDatabase::with_tree(json!({"products": {"a": tee("Alpha")}}));
        let catalog = CatalogStore::connect(Db::new(db.clone()), clock());
        loaded(&catalog, 1).await;

        db.set_read_only(true);
        assert!(catalog.add(ProductDraft::new("X", 1.0, "tees")).await.is_err());
        assert!(catalog.delete(&ProductId::new("a")).await.is_err());
        assert!(catalog.delete(&ProductId::new("bad.id")).await.is_err());
    }

    #[tokio::test]
    async fn test_reads() {
        let db = MemoryDatabase::with_tree(json!({"products": {
            "a": {"name": "Pigment Dyed Tee", "price": 48.0, "category": "tees", "featured": true},
            "b": {"name": "Wool Beanie", "price": 30.0, "category": "headwear", "newArrival": true, "inStock": false}
        }}));
        let catalog = CatalogStore::connect(Db::new(db), clock());
        loaded(&catalog, 2).await;

        assert_eq!(catalog.get_by_id("b").unwrap().name, "Wool Beanie");
        assert!(catalog.get_by_id("zzz").is_none());
        assert_eq!(catalog.get_by_name("pigment-dyed-tee").unwrap().price, 48.0);
        assert_eq!(catalog.get_by_name("Pigment%20Dyed%20Tee").unwrap().price, 48.0);
        assert_eq!(catalog.featured().len(), 1);
        assert_eq!(catalog.new_arrivals()[0].name, "Wool Beanie");
        assert_eq!(catalog.by_category("headwear").len(), 1);
        assert_eq!(catalog.filter(&[Filter::InStock]).len(), 1);

        let stats = catalog.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.in_stock, 1);
    }

    #[tokio::test]
    async fn test_unreadable_records_are_skipped() {
        let db = MemoryDatabase::with_tree(json!({"products": {
            "a": tee("Alpha"),
            "b": {"price": "free"}
        }}));
        let catalog = CatalogStore::connect(Db::new(db), clock());
        let products = loaded(&catalog, 1).await;
        assert_eq!(products[0].name, "Alpha");
    }

    #[tokio::test]
    async fn test_shutdown_stops_feed() {
        let db = MemoryDatabase::with_tree(json!({"products": {"a": tee("Alpha")}}));
        let catalog = CatalogStore::connect(Db::new(db.clone()), clock());
        loaded(&catalog, 1).await;
        assert!(catalog.is_running());

        catalog.shutdown();
        assert!(!catalog.is_running());
        catalog.add(ProductDraft::new("B", 1.0, "tees")).await.unwrap();
        tokio::task::yield_now().await;
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_connect_without_runtime_serves_placeholders() {
        let catalog = CatalogStore::connect(Db::new(MemoryDatabase::new()), clock());
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.source(), CatalogSource::Placeholder);
        assert!(!catalog.is_running());
    }
}
