//! Placeholder catalog used when the realtime store is empty or
//! unreachable.

use crate::catalog::product::{Product, ProductDraft};

/// Identifier prefix for placeholders published without a store round trip.
pub const PLACEHOLDER_ID_PREFIX: &str = "placeholder-";

const TEE_NAME: &str = "SUKO GROWN TEE PIGMENT DYED";
const TEE_PRICE: f64 = 48.0;

/// The four placeholder tees, in seed order.
pub fn placeholder_products() -> Vec<ProductDraft> {
    vec![
        ProductDraft::new(TEE_NAME, TEE_PRICE, "tees")
            .with_description("Premium cotton tee with pigment dyed finish")
            .with_images(&["/assets/products/tee1.svg"])
            .with_sizes(&["XS", "S", "M", "L", "XL"])
            .with_colors(&["Gray"])
            .in_stock(false)
            .featured(true),
        ProductDraft::new(TEE_NAME, TEE_PRICE, "tees")
            .with_description("Comfortable streetwear essential")
            .with_images(&["/assets/products/tee2.svg"])
            .with_sizes(&["S", "M", "L", "XL"])
            .with_colors(&["Blue"]),
        ProductDraft::new(TEE_NAME, TEE_PRICE, "tees")
            .with_description("Limited edition design")
            .with_images(&["/assets/products/tee3.svg"])
            .with_sizes(&["XS", "S", "M", "L", "XL", "XXL"])
            .with_colors(&["Green"])
            .featured(true),
        ProductDraft::new(TEE_NAME, TEE_PRICE, "tees")
            .with_images(&["/assets/products/tee4.svg"])
            .with_sizes(&["S", "M", "L"])
            .with_colors(&["Red"]),
    ]
}

/// Placeholders as local products with ids `placeholder-1..4`.
pub fn local_placeholders(now_ms: i64) -> Vec<Product> {
    placeholder_products()
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            Product::from_draft(draft, now_ms).with_id(format!("{PLACEHOLDER_ID_PREFIX}{}", i + 1))
        })
        .collect()
}
