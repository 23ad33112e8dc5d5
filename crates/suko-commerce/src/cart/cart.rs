//! Cart and line item types.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Money, BASE_CURRENCY};
use serde::{Deserialize, Serialize};

/// Identity of a cart line: the product plus the chosen variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    pub fn new(product_id: ProductId, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            product_id,
            size: size.map(String::from),
            color: color.map(String::from),
        }
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    /// Always positive.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartItem {
    /// Check whether this line has the given identity.
    pub fn matches(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        self.product.id.as_ref() == Some(product_id)
            && self.size.as_deref() == size
            && self.color.as_deref() == color
    }

    /// The line identity, if the product snapshot carries an id.
    pub fn key(&self) -> Option<LineKey> {
        self.product.id.clone().map(|id| LineKey {
            product_id: id,
            size: self.size.clone(),
            color: self.color.clone(),
        })
    }

    /// Unit price times quantity, in the base currency.
    pub fn line_total(&self) -> Money {
        let unit = self.product.unit_price();
        Money::new(
            unit.amount_cents.saturating_mul(i64::from(self.quantity)),
            BASE_CURRENCY,
        )
    }
}

/// A shopping cart.
///
/// Lines keep insertion order. No two lines share a [`LineKey`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// Merges into an existing line with the same product, size and color,
    /// otherwise appends a new line.
    ///
    /// Returns an error if:
    /// - Quantity is zero
    /// - The product has no identifier
    /// - The merged quantity overflows
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        let product_id = product
            .id
            .as_ref()
            .ok_or_else(|| CommerceError::MissingProductId(product.name.clone()))?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, size, color))
        {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            existing.quantity = new_quantity;
            return Ok(());
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity,
            size: size.map(String::from),
            color: color.map(String::from),
        });
        Ok(())
    }

    /// Remove the line matching product, size and color.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        let len_before = self.items.len();
        self.items.retain(|item| !item.matches(product_id, size, color));
        self.items.len() < len_before
    }

    /// Replace the quantity of a line.
    ///
    /// If quantity is <= 0, removes the line. Returns whether the cart
    /// changed.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(product_id, size, color));
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| CommerceError::InvalidQuantity(quantity))?;

        match self
            .items
            .iter_mut()
            .find(|item| item.matches(product_id, size, color))
        {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get total item count (sum of quantities).
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals in the base currency.
    pub fn total_price(&self) -> Money {
        let cents = self
            .items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.line_total().amount_cents));
        Money::new(cents, BASE_CURRENCY)
    }

    /// Find a line by identity.
    pub fn get(&self, key: &LineKey) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.matches(&key.product_id, key.size.as_deref(), key.color.as_deref()))
    }

    /// Refresh product snapshots from the latest catalog.
    ///
    /// Lines whose product is no longer listed keep their old snapshot.
    /// Returns whether any snapshot changed.
    pub fn sync_products(&mut self, products: &[Product]) -> bool {
        let mut changed = false;
        for item in &mut self.items {
            let Some(id) = item.product.id.as_ref() else {
                continue;
            };
            if let Some(latest) = products.iter().find(|p| p.id.as_ref() == Some(id)) {
                if *latest != item.product {
                    item.product = latest.clone();
                    changed = true;
                }
            }
        }
        changed
    }
}
