//! Simulated payment processing.

use crate::cart::CartStore;
use crate::clock::Clock;
use crate::currency::CurrencyService;
use crate::error::{StoreError, StoreResult};
use crate::navigation::{Navigator, Route};
use crate::observable::{Observable, Subscription};
use std::sync::Arc;
use std::time::Duration;
use suko_commerce::cart::CartItem;
use suko_commerce::checkout::{CheckoutForm, OrderConfirmation};
use suko_commerce::CommerceError;

/// How long a simulated payment takes.
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_millis(2000);

/// Resets the processing flag when payment ends, including on cancellation.
struct Processing<'a>(&'a Observable<bool>);

impl Drop for Processing<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Turns a valid checkout form and a non-empty cart into an order.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    cart: Arc<CartStore>,
    currency: CurrencyService,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    delay: Duration,
    processing: Observable<bool>,
    last_order: Observable<Option<OrderConfirmation>>,
}

impl CheckoutService {
    pub fn new(
        cart: Arc<CartStore>,
        currency: CurrencyService,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cart,
            currency,
            navigator,
            clock,
            delay: DEFAULT_CHECKOUT_DELAY,
            processing: Observable::new(false),
            last_order: Observable::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The route to open the checkout at: the bag when it is empty.
    pub fn entry_route(&self) -> Route {
        if self.cart.is_empty() {
            Route::Cart
        } else {
            Route::Checkout
        }
    }

    /// Pay for the current cart.
    ///
    /// Fails with [`CommerceError::EmptyCart`] or
    /// [`CommerceError::CheckoutIncomplete`] before anything happens.
    /// Otherwise waits out the processing delay, records the order, empties
    /// the cart and navigates to the order confirmation.
    pub async fn process_payment(&self, form: &CheckoutForm) -> StoreResult<OrderConfirmation> {
        if self.cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        form.validate()?;

        if !self.processing.modify_if(|busy| !std::mem::replace(busy, true)) {
            return Err(StoreError::CheckoutInProgress);
        }
        let guard = Processing(&self.processing);

        tracing::info!(items = self.cart.total_item_count(), "processing payment");
        tokio::time::sleep(self.delay).await;

        let cart = self.cart.cart();
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        let order = OrderConfirmation::from_cart(
            &cart,
            self.currency.currency(),
            form.contact.email.trim(),
            form.shipping.clone(),
            self.clock.now_ms(),
        );
        tracing::info!(
            order_number = %order.order_number,
            total = %order.display_total(),
            "order placed"
        );

        self.cart.clear();
        self.last_order.set(Some(order.clone()));
        drop(guard);
        self.navigator.navigate(Route::OrderConfirmation);
        Ok(order)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    pub fn subscribe_processing(&self) -> Subscription<bool> {
        self.processing.subscribe()
    }

    /// The most recent order placed through this service.
    pub fn last_order(&self) -> Option<OrderConfirmation> {
        self.last_order.get()
    }

    // --- Price helpers in the display currency ---

    pub fn subtotal(&self) -> f64 {
        self.currency.convert(self.cart.total_price().to_decimal(), None)
    }

    pub fn display_subtotal(&self) -> String {
        self.currency.format_money(&self.cart.total_price())
    }

    pub fn line_total(&self, item: &CartItem) -> f64 {
        self.currency.convert(item.line_total().to_decimal(), None)
    }

    pub fn display_line_total(&self, item: &CartItem) -> String {
        self.currency.format_money(&item.line_total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::navigation::HistoryNavigator;
    use crate::notifications::NotificationBus;
    use suko_cache::Cache;
    use suko_commerce::catalog::{Product, ProductDraft};
    use suko_commerce::checkout::{
        is_valid_order_number, ContactDetails, PaymentDetails, ShippingAddress,
    };
    use suko_commerce::Currency;

    struct Fixture {
        cart: Arc<CartStore>,
        currency: CurrencyService,
        navigator: Arc<HistoryNavigator>,
        checkout: CheckoutService,
    }

    fn fixture() -> Fixture {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(1_700_000_000_000));
        let cart = Arc::new(CartStore::load(
            Cache::memory(),
            clock.clone(),
            NotificationBus::new(),
        ));
        let currency = CurrencyService::default();
        let navigator = Arc::new(HistoryNavigator::new());
        let checkout = CheckoutService::new(cart.clone(), currency.clone(), navigator.clone(), clock);
        Fixture {
            cart,
            currency,
            navigator,
            checkout,
        }
    }

    fn tee() -> Product {
        Product::from_draft(ProductDraft::new("Pigment Dyed Tee", 48.0, "tees"), 0).with_id("tee-1")
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            contact: ContactDetails::new("jo@example.com"),
            shipping: ShippingAddress {
                first_name: "Jo".into(),
                last_name: "Doe".into(),
                address: "1 Main St".into(),
                city: "Copenhagen".into(),
                postal_code: "1000".into(),
                country: "DK".into(),
            },
            payment: PaymentDetails {
                card_number: "4242424242424242".into(),
                expiry_date: "12/30".into(),
                cvv: "123".into(),
                card_name: "Jo Doe".into(),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_is_rejected() {
        let f = fixture();
        let err = f.checkout.process_payment(&valid_form()).await.unwrap_err();
        assert!(matches!(err, StoreError::Commerce(CommerceError::EmptyCart)));
        assert_eq!(f.checkout.entry_route(), Route::Cart);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_form_is_rejected() {
        let f = fixture();
        f.cart.add(&tee(), 1, None, None).unwrap();

        let mut form = valid_form();
        form.contact.email = "not-an-email".into();
        form.payment.cvv.clear();
        let err = f.checkout.process_payment(&form).await.unwrap_err();
        match err {
            StoreError::Commerce(CommerceError::CheckoutIncomplete(fields)) => {
                assert!(fields.contains("email"));
                assert!(fields.contains("cvv"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!f.cart.is_empty());
        assert!(!f.checkout.is_processing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_clears_cart_and_navigates() {
        let f = fixture();
        f.cart.add(&tee(), 2, Some("M"), None).unwrap();
        f.currency.set_currency(Currency::USD);
        assert_eq!(f.checkout.entry_route(), Route::Checkout);
        assert_eq!(f.checkout.subtotal(), 104.64);
        assert_eq!(f.checkout.display_subtotal(), "$104.64");

        let checkout = f.checkout.clone();
        let form = valid_form();
        let payment = tokio::spawn(async move { checkout.process_payment(&form).await });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(f.checkout.is_processing());
        assert!(!f.cart.is_empty());

        let order = payment.await.unwrap().unwrap();
        assert!(is_valid_order_number(&order.order_number));
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.subtotal.amount_cents, 9600);
        assert_eq!(order.display_currency, Currency::USD);
        assert_eq!(order.display_total(), "$104.64");
        assert_eq!(order.email, "jo@example.com");

        assert!(f.cart.is_empty());
        assert!(!f.checkout.is_processing());
        assert_eq!(f.navigator.current(), Route::OrderConfirmation);
        assert_eq!(f.checkout.last_order(), Some(order));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_payment_while_processing_is_rejected() {
        let f = fixture();
        f.cart.add(&tee(), 1, None, None).unwrap();

        let checkout = f.checkout.clone();
        let form = valid_form();
        let first = tokio::spawn(async move { checkout.process_payment(&form).await });
        tokio::task::yield_now().await;

        let err = f.checkout.process_payment(&valid_form()).await.unwrap_err();
        assert!(matches!(err, StoreError::CheckoutInProgress));
        assert!(first.await.unwrap().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_payment_resets_processing() {
        let f = fixture();
        f.cart.add(&tee(), 1, None, None).unwrap();

        let form = valid_form();
        let result = tokio::time::timeout(
            Duration::from_millis(500),
            f.checkout.process_payment(&form),
        )
        .await;
        assert!(result.is_err());
        assert!(!f.checkout.is_processing());
        assert!(!f.cart.is_empty());
    }
}
