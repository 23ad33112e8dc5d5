//! Checkout module.
//!
//! Contains the three-step checkout form, its step state and order
//! confirmations.

mod address;
mod flow;
mod order;

pub use address::{is_valid_email, ContactDetails, PaymentDetails, ShippingAddress};
pub use flow::{CheckoutFlow, CheckoutForm, CheckoutStep};
pub use order::{generate_order_number, is_valid_order_number, OrderConfirmation, ORDER_NUMBER_LEN};
