//! Catalog filter types.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// A catalog filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Exact category tag.
    Category(String),
    /// Only featured products.
    Featured,
    /// Only products flagged as new arrivals.
    NewArrivals,
    /// Only in-stock products.
    InStock,
    /// Only products whose original price is above the price.
    OnSale,
    /// Price range in the base currency, inclusive.
    PriceRange { min: Option<f64>, max: Option<f64> },
    /// Products offered in this size.
    Size(String),
    /// Products offered in this color.
    Color(String),
    /// Case-insensitive substring of name, description or category.
    Text(String),
}

impl Filter {
    pub fn category(category: impl Into<String>) -> Self {
        Filter::Category(category.into())
    }

    pub fn price_range(min: Option<f64>, max: Option<f64>) -> Self {
        Filter::PriceRange { min, max }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Filter::Text(text.into())
    }

    /// Check whether a product passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Category(category) => product.category == *category,
            Filter::Featured => product.featured,
            Filter::NewArrivals => product.new_arrival,
            Filter::InStock => product.in_stock,
            Filter::OnSale => product.is_on_sale(),
            Filter::PriceRange { min, max } => {
                min.map_or(true, |min| product.price >= min)
                    && max.map_or(true, |max| product.price <= max)
            }
            Filter::Size(size) => product.sizes.iter().any(|s| s == size),
            Filter::Color(color) => product.colors.iter().any(|c| c == color),
            Filter::Text(text) => text_matches(product, text),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Filter::Category(category) => format!("Category: {category}"),
            Filter::Featured => "Featured".to_string(),
            Filter::NewArrivals => "New arrivals".to_string(),
            Filter::InStock => "In stock".to_string(),
            Filter::OnSale => "On sale".to_string(),
            Filter::PriceRange { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("{min:.2} - {max:.2}"),
                (Some(min), None) => format!("From {min:.2}"),
                (None, Some(max)) => format!("Up to {max:.2}"),
                (None, None) => "Any price".to_string(),
            },
            Filter::Size(size) => format!("Size: {size}"),
            Filter::Color(color) => format!("Color: {color}"),
            Filter::Text(text) => format!("\"{text}\""),
        }
    }
}

/// Case-insensitive substring match over name, description and category.
///
/// A blank needle matches everything.
pub(crate) fn text_matches(product: &Product, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(&needle)
        || product
            .description
            .as_deref()
            .map(|d| d.to_lowercase().contains(&needle))
            .unwrap_or(false)
        || product.category.to_lowercase().contains(&needle)
}

/// Keep the products passing every filter, preserving order.
pub fn apply_filters(products: &[Product], filters: &[Filter]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| filters.iter().all(|f| f.matches(p)))
        .cloned()
        .collect()
}
