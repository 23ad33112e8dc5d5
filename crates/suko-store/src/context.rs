//! Wiring of every store into one storefront context.

use crate::admin::AdminDashboard;
use crate::auth::AuthGate;
use crate::cart::{CartStore, CART_TTL};
use crate::catalog::CatalogStore;
use crate::checkout::{CheckoutService, DEFAULT_CHECKOUT_DELAY};
use crate::clock::{Clock, SystemClock};
use crate::currency::CurrencyService;
use crate::navigation::{HistoryNavigator, Navigator, Route};
use crate::notifications::{NotificationBus, DEFAULT_NOTIFICATION_DURATION};
use crate::search::SearchService;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use suko_auth::{CredentialVerifier, MockCredentials};
use suko_cache::Cache;
use suko_commerce::Currency;
use suko_db::{Db, MemoryDatabase, RealtimeDatabase};
use tokio::task::JoinHandle;

/// Builder for [`StoreContext`].
///
/// Every dependency has a local default: an in-memory database and cache,
/// the development credentials, an in-process navigator and the system
/// clock.
pub struct StoreContextBuilder {
    db: Option<Db>,
    cache: Option<Cache>,
    verifier: Option<Arc<dyn CredentialVerifier>>,
    navigator: Option<Arc<dyn Navigator>>,
    clock: Option<Arc<dyn Clock>>,
    currency: Currency,
    checkout_delay: Duration,
    notification_duration: Duration,
    cart_ttl: Duration,
}

impl Default for StoreContextBuilder {
    fn default() -> Self {
        Self {
            db: None,
            cache: None,
            verifier: None,
            navigator: None,
            clock: None,
            currency: Currency::default(),
            checkout_delay: DEFAULT_CHECKOUT_DELAY,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            cart_ttl: CART_TTL,
        }
    }
}

impl StoreContextBuilder {
    pub fn database(mut self, database: impl RealtimeDatabase + 'static) -> Self {
        self.db = Some(Db::new(database));
        self
    }

    pub fn db(mut self, db: Db) -> Self {
        self.db = Some(db);
        self
    }

    pub fn cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn verifier(mut self, verifier: impl CredentialVerifier + 'static) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn checkout_delay(mut self, delay: Duration) -> Self {
        self.checkout_delay = delay;
        self
    }

    pub fn notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    pub fn cart_ttl(mut self, ttl: Duration) -> Self {
        self.cart_ttl = ttl;
        self
    }

    /// Create every store and start the background tasks on the current
    /// tokio runtime.
    pub fn build(self) -> StoreContext {
        let db = self.db.unwrap_or_else(|| Db::new(MemoryDatabase::new()));
        let cache = self.cache.unwrap_or_default();
        let verifier: Arc<dyn CredentialVerifier> = match self.verifier {
            Some(verifier) => verifier,
            None => Arc::new(MockCredentials::default()),
        };
        let navigator: Arc<dyn Navigator> = match self.navigator {
            Some(navigator) => navigator,
            None => Arc::new(HistoryNavigator::new()),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        let bus = NotificationBus::with_default_duration(self.notification_duration);
        let currency = CurrencyService::new(self.currency);
        let catalog = Arc::new(CatalogStore::connect(db, clock.clone()));
        let cart = Arc::new(CartStore::with_ttl(
            cache.clone(),
            clock.clone(),
            bus.clone(),
            self.cart_ttl,
        ));
        let auth = AuthGate::new(verifier, cache);
        let search = SearchService::new(catalog.clone(), navigator.clone());
        let checkout = CheckoutService::new(
            cart.clone(),
            currency.clone(),
            navigator.clone(),
            clock.clone(),
        )
        .with_delay(self.checkout_delay);
        let admin = AdminDashboard::new(auth.clone(), catalog.clone(), bus.clone());

        let cart_sync = spawn_cart_sync(&catalog, &cart);

        tracing::info!(
            products = catalog.len(),
            cart_items = cart.total_item_count(),
            admin = auth.is_authenticated(),
            "store context built"
        );

        StoreContext {
            bus,
            currency,
            catalog,
            cart,
            search,
            auth,
            checkout,
            admin,
            navigator,
            clock,
            cart_sync: Mutex::new(cart_sync),
        }
    }
}

/// Keep cart line snapshots current with the catalog.
fn spawn_cart_sync(catalog: &CatalogStore, cart: &Arc<CartStore>) -> Option<JoinHandle<()>> {
    let runtime = tokio::runtime::Handle::try_current().ok()?;
    let mut products = catalog.subscribe();
    let cart = Arc::clone(cart);
    Some(runtime.spawn(async move {
        while let Some(snapshot) = products.next().await {
            if !snapshot.is_empty() {
                cart.sync_products(&snapshot);
            }
        }
    }))
}

/// The storefront's state: one instance of every store, wired together.
///
/// # Example
///
/// ```rust,ignore
/// let store = StoreContext::builder()
///     .database(MemoryDatabase::new())
///     .cache(Cache::open_dir(".suko")?)
///     .build();
///
/// let tee = store.catalog().get_by_name("suko-grown-tee-pigment-dyed").unwrap();
/// store.cart().add(&tee, 1, Some("M"), None)?;
/// ```
pub struct StoreContext {
    bus: NotificationBus,
    currency: CurrencyService,
    catalog: Arc<CatalogStore>,
    cart: Arc<CartStore>,
    search: SearchService,
    auth: AuthGate,
    checkout: CheckoutService,
    admin: AdminDashboard,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    cart_sync: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("products", &self.catalog.len())
            .field("cart_items", &self.cart.total_item_count())
            .field("route", &self.navigator.current())
            .finish_non_exhaustive()
    }
}

impl StoreContext {
    pub fn builder() -> StoreContextBuilder {
        StoreContextBuilder::default()
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn currency(&self) -> &CurrencyService {
        &self.currency
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn auth(&self) -> &AuthGate {
        &self.auth
    }

    pub fn checkout(&self) -> &CheckoutService {
        &self.checkout
    }

    pub fn admin(&self) -> &AdminDashboard {
        &self.admin
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Navigate through the auth guard. Returns the route actually taken.
    pub fn navigate(&self, route: Route) -> Route {
        let route = self.auth.guard(route);
        self.navigator.navigate(route.clone());
        route
    }

    /// Parse `url` and navigate to it through the auth guard.
    pub fn navigate_to(&self, url: &str) -> Route {
        self.navigate(Route::parse(url))
    }

    /// Stop the catalog feed and cart sync, and cancel notification
    /// timers. Stores stay readable.
    pub fn shutdown(&self) {
        self.catalog.shutdown();
        let cart_sync = self
            .cart_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = cart_sync {
            task.abort();
        }
        self.bus.cancel_timers();
        tracing::debug!("store context shut down");
    }
}

impl Drop for StoreContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use suko_auth::{MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD};
    use suko_commerce::catalog::Product;

    #[tokio::test]
    async fn test_defaults_seed_an_empty_database() {
        let store = StoreContext::builder().build();
        let products = store
            .catalog()
            .subscribe()
            .wait_for(|p| p.len() == 4)
            .await
            .unwrap();
        assert!(products.iter().all(|p| p.category == "tees"));
        assert_eq!(store.navigator().current(), Route::Home);
    }

    #[tokio::test]
    async fn test_navigate_applies_guard() {
        let store = StoreContext::builder().build();
        assert_eq!(store.navigate_to("/admin/dashboard"), Route::AdminLogin);

        store
            .auth()
            .login(MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert_eq!(store.navigate_to("/admin/dashboard"), Route::AdminDashboard);
        assert_eq!(store.navigator().current(), Route::AdminDashboard);
    }

    #[tokio::test]
    async fn test_cart_follows_catalog_prices() {
        let db = MemoryDatabase::new();
        let store = StoreContext::builder()
            .database(db.clone())
            .clock(Arc::new(ManualClock::new(1_000)))
            .build();
        let products: Vec<Product> = store
            .catalog()
            .subscribe()
            .wait_for(|p| p.len() == 4)
            .await
            .unwrap();
        let tee = &products[0];
        let id = tee.id.clone().unwrap();
        store.cart().add(tee, 1, None, None).unwrap();

        let patch = suko_commerce::catalog::ProductPatch {
            price: Some(10.0),
            ..Default::default()
        };
        store.catalog().update(&id, patch).await.unwrap();

        let cart = store
            .cart()
            .subscribe()
            .wait_for(|cart| cart.items[0].product.price == 10.0)
            .await
            .unwrap();
        assert_eq!(cart.total_price().amount_cents, 1000);
    }

    #[tokio::test]
    async fn test_shutdown_stops_background_tasks() {
        let store = StoreContext::builder().build();
        store.catalog().subscribe().wait_for(|p| p.len() == 4).await;
        assert!(store.catalog().is_running());

        store.shutdown();
        assert!(!store.catalog().is_running());
        assert_eq!(store.catalog().len(), 4);
    }

    #[test]
    fn test_build_without_runtime() {
        let store = StoreContext::builder().build();
        assert_eq!(store.catalog().len(), 4);
        assert!(!store.catalog().is_running());
    }
}
