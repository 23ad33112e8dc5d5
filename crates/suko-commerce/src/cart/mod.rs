//! Shopping cart module.
//!
//! Contains the cart and its line items, identified by product, size and
//! color.

mod cart;

pub use cart::{Cart, CartItem, LineKey};
