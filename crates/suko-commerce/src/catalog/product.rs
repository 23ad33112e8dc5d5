//! Product records, drafts and partial updates.

use crate::catalog::slug::{decode_slug, slugify};
use crate::ids::ProductId;
use crate::money::{Money, BASE_CURRENCY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_in_stock() -> bool {
    true
}

/// A product in the catalog.
///
/// This is also the wire format of a record under `products/<id>` in the
/// realtime store, except that `id` is carried by the key and never written
/// into the record body (see [`Product::to_record`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier assigned by the data store; `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Product name.
    pub name: String,
    /// Optional long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in the base currency.
    pub price: f64,
    /// Original price, shown struck through while on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Generic image references.
    #[serde(default)]
    pub images: Vec<String>,
    /// Image references per color variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_images: Option<BTreeMap<String, Vec<String>>>,
    /// Free-form category tag (e.g. "tees").
    pub category: String,
    /// Available sizes.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Available colors.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub new_arrival: bool,
    /// Epoch milliseconds of creation.
    #[serde(default)]
    pub created_at: i64,
    /// Epoch milliseconds of last update.
    #[serde(default)]
    pub updated_at: i64,
}

impl Product {
    /// Build an unsaved product from a draft, stamping both timestamps.
    pub fn from_draft(draft: ProductDraft, now_ms: i64) -> Self {
        Self {
            id: None,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            original_price: draft.original_price,
            images: draft.images,
            color_images: draft.color_images,
            category: draft.category,
            sizes: draft.sizes,
            colors: draft.colors,
            in_stock: draft.in_stock,
            featured: draft.featured,
            new_arrival: draft.new_arrival,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Attach the store-assigned identifier.
    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Check whether the product has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// The record body as written to the realtime store (no `id`).
    pub fn to_record(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.remove("id");
        }
        Ok(value)
    }

    /// Parse a record body stored under `key`.
    pub fn from_record(key: &str, record: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut product: Product = serde_json::from_value(record)?;
        product.id = Some(ProductId::new(key));
        Ok(product)
    }

    /// Unit price as money in the base currency.
    pub fn unit_price(&self) -> Money {
        Money::from_decimal(self.price, BASE_CURRENCY)
    }

    /// Check if the product is on sale (original price above price).
    pub fn is_on_sale(&self) -> bool {
        self.original_price
            .map(|original| original > self.price)
            .unwrap_or(false)
    }

    /// Calculate the discount percentage if on sale.
    pub fn discount_percentage(&self) -> Option<f64> {
        self.original_price.and_then(|original| {
            if original > self.price && original > 0.0 {
                Some((original - self.price) / original * 100.0)
            } else {
                None
            }
        })
    }

    /// URL slug of the product name.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Check whether a (possibly percent-encoded) slug or name refers to
    /// this product, ignoring case.
    pub fn matches_name(&self, name_or_slug: &str) -> bool {
        let wanted = decode_slug(name_or_slug);
        !wanted.is_empty() && wanted == self.slug()
    }

    /// Images for a color variant, falling back to the generic images.
    pub fn images_for_color(&self, color: &str) -> &[String] {
        self.color_images
            .as_ref()
            .and_then(|by_color| by_color.get(color))
            .filter(|images| !images.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(&self.images)
    }

    /// First generic image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A product that has not been persisted: everything but the identifier
/// and the store-managed timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_images: Option<BTreeMap<String, Vec<String>>>,
    pub category: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub new_arrival: bool,
}

impl ProductDraft {
    /// Create an in-stock draft with no variants or images.
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            original_price: None,
            images: Vec::new(),
            color_images: None,
            category: category.into(),
            sizes: Vec::new(),
            colors: Vec::new(),
            in_stock: true,
            featured: false,
            new_arrival: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_images(mut self, images: &[&str]) -> Self {
        self.images = images.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_sizes(mut self, sizes: &[&str]) -> Self {
        self.sizes = sizes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn new_arrival(mut self, new_arrival: bool) -> Self {
        self.new_arrival = new_arrival;
        self
    }
}

/// A partial product update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_images: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_arrival: Option<bool>,
    /// Set by the catalog store on every update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl ProductPatch {
    /// Stamp the update time.
    pub fn touched(mut self, now_ms: i64) -> Self {
        self.updated_at = Some(now_ms);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }

    /// The patch as a field map for a shallow merge.
    pub fn to_fields(&self) -> Result<serde_json::Map<String, serde_json::Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(serde_json::Map::new()),
        }
    }

    /// Apply the patch to a product in place.
    pub fn apply(&self, product: &mut Product) {
        if let Some(ref name) = self.name {
            product.name = name.clone();
        }
        if let Some(ref description) = self.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(original_price) = self.original_price {
            product.original_price = Some(original_price);
        }
        if let Some(ref images) = self.images {
            product.images = images.clone();
        }
        if let Some(ref color_images) = self.color_images {
            product.color_images = Some(color_images.clone());
        }
        if let Some(ref category) = self.category {
            product.category = category.clone();
        }
        if let Some(ref sizes) = self.sizes {
            product.sizes = sizes.clone();
        }
        if let Some(ref colors) = self.colors {
            product.colors = colors.clone();
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(new_arrival) = self.new_arrival {
            product.new_arrival = new_arrival;
        }
        if let Some(updated_at) = self.updated_at {
            product.updated_at = updated_at;
        }
    }
}

impl From<ProductDraft> for ProductPatch {
    /// A patch that overwrites every draft field.
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: draft.description,
            price: Some(draft.price),
            original_price: draft.original_price,
            images: Some(draft.images),
            color_images: draft.color_images,
            category: Some(draft.category),
            sizes: Some(draft.sizes),
            colors: Some(draft.colors),
            in_stock: Some(draft.in_stock),
            featured: Some(draft.featured),
            new_arrival: Some(draft.new_arrival),
            updated_at: None,
        }
    }
}
