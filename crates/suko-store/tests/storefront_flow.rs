//! End-to-end storefront flow over an in-memory database and a file-backed
//! local store.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use suko_auth::{MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD};
use suko_cache::Cache;
use suko_commerce::catalog::{Product, ProductForm};
use suko_commerce::checkout::{CheckoutForm, ContactDetails, PaymentDetails, ShippingAddress};
use suko_commerce::Currency;
use suko_db::MemoryDatabase;
use suko_store::prelude::*;
use suko_store::CART_STORAGE_KEY;

const NOW: i64 = 1_700_000_000_000;

fn build(
    db: &MemoryDatabase,
    dir: &Path,
    clock: &Arc<ManualClock>,
) -> (StoreContext, Arc<HistoryNavigator>) {
    let navigator = Arc::new(HistoryNavigator::new());
    let clock: Arc<dyn Clock> = clock.clone();
    let store = StoreContext::builder()
        .database(db.clone())
        .cache(Cache::open_dir(dir).unwrap())
        .navigator(navigator.clone())
        .clock(clock)
        .build();
    (store, navigator)
}

async fn products(store: &StoreContext, count: usize) -> Vec<Product> {
    store
        .catalog()
        .subscribe()
        .wait_for(|p| p.len() == count)
        .await
        .unwrap()
}

fn checkout_form() -> CheckoutForm {
    CheckoutForm {
        contact: ContactDetails::new("shopper@example.com"),
        shipping: ShippingAddress {
            first_name: "Sam".into(),
            last_name: "Berg".into(),
            address: "Vesterbrogade 1".into(),
            city: "Copenhagen".into(),
            postal_code: "1620".into(),
            country: "Denmark".into(),
        },
        payment: PaymentDetails {
            card_number: "4000 0000 0000 0002".into(),
            expiry_date: "01/29".into(),
            cvv: "999".into(),
            card_name: "Sam Berg".into(),
        },
    }
}

#[tokio::test(start_paused = true)]
async fn test_shopper_checks_out() {
    let db = MemoryDatabase::new();
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(NOW));
    let (store, navigator) = build(&db, dir.path(), &clock);

    // First run seeds the database.
    let catalog = products(&store, 4).await;
    assert_eq!(store.catalog().source(), CatalogSource::Live);
    assert_eq!(db.snapshot()["products"].as_object().unwrap().len(), 4);

    // Search and open a product.
    let hits = store.search().search("streetwear");
    assert_eq!(hits.len(), 1);
    store.search().navigate_to_search("streetwear");
    assert_eq!(navigator.current(), Route::search("streetwear"));

    let tee = hits[0].clone();
    let route = store.navigate(Route::product(tee.id.clone().unwrap().into_inner()));
    assert!(matches!(route, Route::Product { .. }));
    assert!(store.catalog().get_by_id(tee.id.as_ref().unwrap().as_str()).is_some());

    // Fill the bag.
    store.cart().add(&tee, 1, Some("M"), Some("Blue")).unwrap();
    store.cart().add(&tee, 1, Some("M"), Some("Blue")).unwrap();
    store.cart().add(&catalog[2], 1, Some("XXL"), None).unwrap();
    assert_eq!(store.cart().total_item_count(), 3);
    assert_eq!(store.cart().total_price().display(), "\u{20ac}144.00");

    let messages = store.notifications().messages();
    assert_eq!(messages.len(), 3);
    assert!(messages
        .iter()
        .all(|m| m.message.ends_with("added to bag") && m.kind == NotificationKind::Success));

    // Bag notifications expire on their own.
    tokio::time::sleep(Duration::from_millis(4001)).await;
    assert!(store.notifications().messages().is_empty());

    // Pay in kroner.
    store.currency().set_currency(Currency::DKK);
    assert_eq!(store.checkout().display_subtotal(), "kr1072.80");
    assert_eq!(store.checkout().entry_route(), Route::Checkout);

    let order = store.checkout().process_payment(&checkout_form()).await.unwrap();
    assert_eq!(order.item_count(), 3);
    assert_eq!(order.display_total(), "kr1072.80");
    assert_eq!(order.ship_to.city, "Copenhagen");

    assert!(store.cart().is_empty());
    assert_eq!(navigator.current(), Route::OrderConfirmation);
    assert!(!Cache::open_dir(dir.path()).unwrap().exists(CART_STORAGE_KEY).unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_state_survives_restart() {
    let db = MemoryDatabase::new();
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(NOW));

    {
        let (store, _) = build(&db, dir.path(), &clock);
        let catalog = products(&store, 4).await;
        store.cart().add(&catalog[1], 2, Some("L"), None).unwrap();
        store
            .auth()
            .login(MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD)
            .await
            .unwrap();
        store.shutdown();
    }

    // Second run: no reseeding, cart and admin session restored.
    clock.advance(60 * 60 * 1000);
    let (store, _) = build(&db, dir.path(), &clock);
    products(&store, 4).await;
    assert_eq!(store.cart().total_item_count(), 2);
    assert!(store.auth().is_authenticated());
    assert_eq!(store.navigate_to("/admin/dashboard"), Route::AdminDashboard);

    store.auth().logout();
    assert_eq!(store.navigate_to("/admin/dashboard"), Route::AdminLogin);
    drop(store);

    // A day later the bag is gone.
    clock.advance(24 * 60 * 60 * 1000);
    let (store, _) = build(&db, dir.path(), &clock);
    assert!(store.cart().is_empty());
    assert!(!store.auth().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_admin_manages_catalog() {
    let db = MemoryDatabase::new();
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(NOW));
    let (store, _) = build(&db, dir.path(), &clock);
    products(&store, 4).await;

    store
        .auth()
        .login(MOCK_ADMIN_EMAIL, MOCK_ADMIN_PASSWORD)
        .await
        .unwrap();

    let mut form = ProductForm::new();
    form.name = "Heavyweight Hoodie".into();
    form.price = 120.0;
    form.category = "sweats".into();
    form.toggle_size("M");
    form.toggle_size("L");
    form.new_arrival = true;

    let id = store.admin().save(&form, None).await.unwrap();
    let catalog = products(&store, 5).await;
    let hoodie = catalog.iter().find(|p| p.id.as_ref() == Some(&id)).unwrap();
    assert_eq!(hoodie.sizes, vec!["M", "L"]);
    assert_eq!(store.catalog().new_arrivals().len(), 1);
    assert_eq!(store.catalog().by_category("sweats").len(), 1);
    assert_eq!(store.admin().stats().unwrap().total, 5);
    assert_eq!(
        store.notifications().messages().last().unwrap().message,
        "Product created successfully!"
    );

    let sweats = store.admin().filtered("hoodie", Some("sweats")).unwrap();
    assert_eq!(sweats.len(), 1);

    store.admin().delete(&id).await.unwrap();
    products(&store, 4).await;
    assert_eq!(
        store.notifications().messages().last().unwrap().message,
        "Product deleted successfully!"
    );
}

#[tokio::test]
async fn test_offline_database_serves_placeholders() {
    let store = StoreContext::builder()
        .database(suko_db::OfflineDatabase::new("no network"))
        .build();

    let catalog = products(&store, 4).await;
    assert_eq!(store.catalog().source(), CatalogSource::Placeholder);
    assert!(catalog
        .iter()
        .all(|p| p.id.as_ref().unwrap().as_str().starts_with("placeholder-")));

    // Placeholders can still be bagged.
    store.cart().add(&catalog[0], 1, None, None).unwrap();
    assert_eq!(store.cart().total_item_count(), 1);
}
