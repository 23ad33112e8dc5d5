//! Order confirmations.

use crate::cart::{Cart, CartItem};
use crate::checkout::ShippingAddress;
use crate::money::{Currency, Money};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated order number.
pub const ORDER_NUMBER_LEN: usize = 9;

const ORDER_NUMBER_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random order number of uppercase letters and digits.
pub fn generate_order_number() -> String {
    let mut rng = rand::thread_rng();
    (0..ORDER_NUMBER_LEN)
        .map(|_| ORDER_NUMBER_ALPHABET[rng.gen_range(0..ORDER_NUMBER_ALPHABET.len())] as char)
        .collect()
}

pub fn is_valid_order_number(number: &str) -> bool {
    number.len() == ORDER_NUMBER_LEN
        && number
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// What the customer sees after a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: String,
    /// Lines as they were in the cart.
    pub items: Vec<CartItem>,
    /// Subtotal in the base currency.
    pub subtotal: Money,
    /// Currency selected at checkout.
    pub display_currency: Currency,
    /// Subtotal converted to the display currency.
    pub display_subtotal: f64,
    pub email: String,
    pub ship_to: ShippingAddress,
    /// Epoch milliseconds.
    pub placed_at: i64,
}

impl OrderConfirmation {
    /// Snapshot a cart into a confirmation with a fresh order number.
    pub fn from_cart(
        cart: &Cart,
        display_currency: Currency,
        email: impl Into<String>,
        ship_to: ShippingAddress,
        placed_at: i64,
    ) -> Self {
        let subtotal = cart.total_price();
        Self {
            order_number: generate_order_number(),
            items: cart.items.clone(),
            subtotal,
            display_currency,
            display_subtotal: display_currency.convert(subtotal.to_decimal()),
            email: email.into(),
            ship_to,
            placed_at,
        }
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Subtotal formatted in the display currency.
    pub fn display_total(&self) -> String {
        self.display_currency.format(self.display_subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, ProductDraft};

    #[test]
    fn test_order_number_shape() {
        for _ in 0..50 {
            let number = generate_order_number();
            assert!(is_valid_order_number(&number), "bad order number {number}");
        }
        assert!(!is_valid_order_number("abc123xyz"));
        assert!(!is_valid_order_number("ABC"));
    }

    #[test]
    fn test_from_cart() {
        let tee = Product::from_draft(ProductDraft::new("Tee", 48.0, "tees"), 0).with_id("t1");
        let mut cart = Cart::new();
        cart.add(&tee, 2, Some("M"), None).unwrap();

        let order = OrderConfirmation::from_cart(
            &cart,
            Currency::USD,
            "a@b.dk",
            ShippingAddress::default(),
            1_700_000_000_000,
        );
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.subtotal.display(), "\u{20ac}96.00");
        assert_eq!(order.display_subtotal, 104.64);
        assert_eq!(order.display_total(), "$104.64");
        assert!(is_valid_order_number(&order.order_number));
    }
}
