//! Admin product form and dashboard statistics.

use crate::catalog::product::{Product, ProductDraft};
use crate::error::CommerceError;
use std::collections::BTreeSet;

/// Sizes offered as toggles in the product form.
pub const AVAILABLE_SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

/// Colors offered as toggles in the product form.
pub const AVAILABLE_COLORS: [&str; 8] = [
    "Black", "White", "Navy", "Grey", "Red", "Green", "Blue", "Pink",
];

/// Maximum number of image previews shown under the form.
pub const MAX_IMAGE_PREVIEWS: usize = 6;

/// Split a comma-separated input, trimming entries and dropping empties.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn toggle_entry(input: &mut String, entry: &str) {
    let mut entries = parse_list(input);
    match entries.iter().position(|e| e == entry) {
        Some(index) => {
            entries.remove(index);
        }
        None => entries.push(entry.to_string()),
    }
    *input = entries.join(", ");
}

/// Swatch color for a named product color.
pub fn color_hex(color: &str) -> &'static str {
    match color {
        "Black" => "#000000",
        "White" => "#FFFFFF",
        "Navy" => "#001f3f",
        "Grey" => "#808080",
        "Red" => "#FF4136",
        "Green" => "#2ECC40",
        "Blue" => "#0074D9",
        "Pink" => "#F012BE",
        _ => "#CCCCCC",
    }
}

/// Text inputs of the admin add/edit product form.
///
/// Sizes, colors and images are comma-separated free text.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Zero means "not on sale".
    pub original_price: f64,
    pub category: String,
    pub in_stock: bool,
    pub featured: bool,
    pub new_arrival: bool,
    pub sizes_input: String,
    pub colors_input: String,
    pub images_input: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: 0.0,
            original_price: 0.0,
            category: String::new(),
            in_stock: true,
            featured: false,
            new_arrival: false,
            sizes_input: String::new(),
            colors_input: String::new(),
            images_input: String::new(),
        }
    }
}

impl ProductForm {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill the form for editing an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price,
            original_price: product.original_price.unwrap_or(0.0),
            category: product.category.clone(),
            in_stock: product.in_stock,
            featured: product.featured,
            new_arrival: product.new_arrival,
            sizes_input: product.sizes.join(", "),
            colors_input: product.colors.join(", "),
            images_input: product.images.join(", "),
        }
    }

    /// Reset every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn sizes(&self) -> Vec<String> {
        parse_list(&self.sizes_input)
    }

    pub fn colors(&self) -> Vec<String> {
        parse_list(&self.colors_input)
    }

    pub fn images(&self) -> Vec<String> {
        parse_list(&self.images_input)
    }

    /// Add the size if absent, remove it otherwise.
    pub fn toggle_size(&mut self, size: &str) {
        toggle_entry(&mut self.sizes_input, size);
    }

    pub fn is_selected_size(&self, size: &str) -> bool {
        self.sizes().iter().any(|s| s == size)
    }

    /// Add the color if absent, remove it otherwise.
    pub fn toggle_color(&mut self, color: &str) {
        toggle_entry(&mut self.colors_input, color);
    }

    pub fn is_selected_color(&self, color: &str) -> bool {
        self.colors().iter().any(|c| c == color)
    }

    /// The first few image references, for previews.
    pub fn image_previews(&self) -> Vec<String> {
        let mut images = self.images();
        images.truncate(MAX_IMAGE_PREVIEWS);
        images
    }

    /// Validate the form and turn it into a product draft.
    pub fn to_draft(&self) -> Result<ProductDraft, CommerceError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CommerceError::ValidationError("name is required".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CommerceError::ValidationError(format!(
                "invalid price: {}",
                self.price
            )));
        }

        let description = self.description.trim();
        Ok(ProductDraft {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            price: self.price,
            original_price: (self.original_price > 0.0).then_some(self.original_price),
            images: self.images(),
            color_images: None,
            category: self.category.trim().to_string(),
            sizes: self.sizes(),
            colors: self.colors(),
            in_stock: self.in_stock,
            featured: self.featured,
            new_arrival: self.new_arrival,
        })
    }
}

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub featured: usize,
    pub in_stock: usize,
    pub categories: usize,
}

impl CatalogStats {
    pub fn from_products(products: &[Product]) -> Self {
        let categories: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
        Self {
            total: products.len(),
            featured: products.iter().filter(|p| p.featured).count(),
            in_stock: products.iter().filter(|p| p.in_stock).count(),
            categories: categories.len(),
        }
    }
}
