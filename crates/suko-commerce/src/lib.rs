//! Storefront domain types and logic for SUKO.
//!
//! This crate holds the pure, synchronous parts of the storefront:
//!
//! - **Catalog**: products, drafts and patches, placeholder seed data, slugs,
//!   category titles, admin product forms
//! - **Cart**: line items keyed by product, size and color
//! - **Checkout**: the three-step checkout form and order confirmations
//! - **Search**: substring search and catalog filters
//!
//! Stateful stores that hold these values live in `suko-store`.
//!
//! # Example
//!
//! ```rust
//! use suko_commerce::prelude::*;
//!
//! let product = Product::from_draft(
//!     ProductDraft::new("Pigment Dyed Tee", 48.0, "tees").with_sizes(&["M"]),
//!     0,
//! )
//! .with_id("tee-1");
//!
//! let mut cart = Cart::new();
//! cart.add(&product, 2, Some("M"), None).unwrap();
//! assert_eq!(cart.total_item_count(), 2);
//! assert_eq!(cart.total_price().display(), "\u{20ac}96.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money, BASE_CURRENCY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, BASE_CURRENCY};

    // Catalog
    pub use crate::catalog::{
        category_title, placeholder_products, slugify, CatalogStats, Product, ProductDraft,
        ProductForm, ProductPatch,
    };

    // Cart
    pub use crate::cart::{Cart, CartItem, LineKey};

    // Checkout
    pub use crate::checkout::{
        CheckoutFlow, CheckoutForm, CheckoutStep, ContactDetails, OrderConfirmation,
        PaymentDetails, ShippingAddress,
    };

    // Search
    pub use crate::search::{Filter, SearchQuery};
}
