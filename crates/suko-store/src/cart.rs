//! The shopper's bag, persisted locally.

use crate::clock::Clock;
use crate::notifications::NotificationBus;
use crate::observable::{Observable, Subscription};
use std::sync::Arc;
use std::time::Duration;
use suko_cache::{Cache, ExpiringSlot};
use suko_commerce::cart::{Cart, CartItem};
use suko_commerce::catalog::Product;
use suko_commerce::{CommerceError, Money, ProductId};

/// Local storage key of the persisted cart.
pub const CART_STORAGE_KEY: &str = "suko.cart";

/// Persisted carts older than this are discarded on load.
pub const CART_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Observable cart with local persistence and bag notifications.
///
/// Every mutation writes the whole cart to storage stamped with the current
/// time. Storage failures are logged and never fail the mutation.
#[derive(Debug)]
pub struct CartStore {
    cart: Observable<Cart>,
    slot: ExpiringSlot<Cart>,
    clock: Arc<dyn Clock>,
    bus: NotificationBus,
}

impl CartStore {
    /// Restore the cart from `cache`, or start empty.
    pub fn load(cache: Cache, clock: Arc<dyn Clock>, bus: NotificationBus) -> Self {
        Self::with_ttl(cache, clock, bus, CART_TTL)
    }

    pub fn with_ttl(cache: Cache, clock: Arc<dyn Clock>, bus: NotificationBus, ttl: Duration) -> Self {
        let slot: ExpiringSlot<Cart> =
            ExpiringSlot::new(cache, CART_STORAGE_KEY, ttl.as_millis() as i64);
        let cart = match slot.load(clock.now_ms()) {
            Ok(Some(cart)) => {
                tracing::debug!(lines = cart.line_count(), "cart restored");
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::debug!(key = CART_STORAGE_KEY, error = %e, "discarding unreadable cart");
                Cart::new()
            }
        };

        Self {
            cart: Observable::new(cart),
            slot,
            clock,
            bus,
        }
    }

    /// Add `quantity` of a product, merging into a line with the same size
    /// and color.
    ///
    /// Rejected adds (zero quantity, unsaved product, over the line limit)
    /// leave the cart unchanged and show nothing.
    pub fn add(
        &self,
        product: &Product,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CommerceError> {
        let mut outcome = Ok(());
        self.cart.modify_if(|cart| match cart.add(product, quantity, size, color) {
            Ok(()) => true,
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome?;

        self.persist();
        self.bus.success(format!("{} added to bag", product.name));
        Ok(())
    }

    /// Remove the matching line. Returns whether a line was removed.
    pub fn remove(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        let removed = self
            .cart
            .modify_if(|cart| cart.remove(product_id, size, color));
        if removed {
            self.persist();
            self.bus.info("Item removed from bag");
        }
        removed
    }

    /// Set a line's quantity; zero or less removes the line.
    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(product_id, size, color));
        }

        let mut outcome = Ok(false);
        self.cart.modify_if(|cart| {
            outcome = cart.update_quantity(product_id, quantity, size, color);
            matches!(outcome, Ok(true))
        });
        if matches!(outcome, Ok(true)) {
            self.persist();
        }
        outcome
    }

    /// Empty the cart and erase it from storage.
    pub fn clear(&self) {
        self.cart.set(Cart::new());
        if let Err(e) = self.slot.clear() {
            tracing::warn!(key = CART_STORAGE_KEY, error = %e, "failed to erase stored cart");
        }
    }

    /// Refresh line snapshots from the catalog.
    pub fn sync_products(&self, products: &[Product]) -> bool {
        let changed = self.cart.modify_if(|cart| cart.sync_products(products));
        if changed {
            tracing::debug!("cart lines refreshed from catalog");
            self.persist();
        }
        changed
    }

    pub fn cart(&self) -> Cart {
        self.cart.get()
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.cart.with(|cart| cart.items.clone())
    }

    pub fn total_item_count(&self) -> u64 {
        self.cart.with(Cart::total_item_count)
    }

    /// Total in the base currency.
    pub fn total_price(&self) -> Money {
        self.cart.with(Cart::total_price)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.with(Cart::is_empty)
    }

    pub fn subscribe(&self) -> Subscription<Cart> {
        self.cart.subscribe()
    }

    fn persist(&self) {
        let result = self
            .cart
            .with(|cart| self.slot.save(cart, self.clock.now_ms()));
        if let Err(e) = result {
            tracing::warn!(key = CART_STORAGE_KEY, error = %e, "failed to persist cart");
        }
    }
}
