//! Runtime stores and services for the SUKO storefront.
//!
//! Each store owns one piece of observable state and publishes it through
//! a `tokio::sync::watch` channel:
//!
//! - **Catalog**: live products from the realtime database, with
//!   placeholder fallback and first-run seeding
//! - **Cart**: the bag, persisted locally for 24 hours
//! - **Currency**: the display currency
//! - **Notifications**: auto-expiring snackbar messages
//! - **Search**, **Checkout**, **Admin**: services over the stores above
//! - **Auth**: the signed-in admin and route guarding
//!
//! [`StoreContext`] wires them together.
//!
//! # Example
//!
//! ```rust
//! use suko_store::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = StoreContext::builder().build();
//!
//! // An empty database is seeded with the placeholder products.
//! let products = store.catalog().subscribe().wait_for(|p| p.len() == 4).await.unwrap();
//!
//! store.cart().add(&products[0], 2, Some("M"), None).unwrap();
//! assert_eq!(store.cart().total_item_count(), 2);
//! assert_eq!(store.notifications().messages().len(), 1);
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod context;
pub mod currency;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod notifications;
pub mod observable;
pub mod search;

pub use admin::AdminDashboard;
pub use auth::AuthGate;
pub use cart::{CartStore, CART_STORAGE_KEY, CART_TTL};
pub use catalog::{CatalogSource, CatalogStore, PRODUCTS_PATH};
pub use checkout::{CheckoutService, DEFAULT_CHECKOUT_DELAY};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{StoreContext, StoreContextBuilder};
pub use currency::CurrencyService;
pub use error::{StoreError, StoreResult};
pub use navigation::{HistoryNavigator, Navigator, Route};
pub use notifications::{
    NotificationBus, NotificationKind, SnackbarMessage, DEFAULT_NOTIFICATION_DURATION,
};
pub use observable::{Observable, Subscription};
pub use search::SearchService;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AdminDashboard, AuthGate, CartStore, CatalogSource, CatalogStore, CheckoutService, Clock,
        CurrencyService, HistoryNavigator, ManualClock, Navigator, NotificationBus,
        NotificationKind, Observable, Route, SearchService, StoreContext, StoreError,
        Subscription, SystemClock,
    };

    pub use suko_commerce::prelude::*;
}
