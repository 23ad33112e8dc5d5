//! Search query.

use crate::catalog::Product;
use crate::search::filter::text_matches;
use crate::search::Filter;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    /// Keep catalog order.
    #[default]
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Sort by newest first.
    Newest,
}

impl SortOption {
    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Relevance => "Relevance",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
            SortOption::Newest => "Newest",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Relevance => Ordering::Equal,
            SortOption::PriceAsc => a.price.total_cmp(&b.price),
            SortOption::PriceDesc => b.price.total_cmp(&a.price),
            SortOption::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOption::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            SortOption::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

/// A text search over the catalog, with optional extra filters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    /// Trimmed, non-empty search text.
    pub text: String,
    /// Filters to apply on top of the text match.
    pub filters: Vec<Filter>,
    /// Sort option.
    pub sort: SortOption,
}

impl SearchQuery {
    /// Build a query from user input. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            filters: Vec::new(),
            sort: SortOption::default(),
        })
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Check whether a product matches the text and every filter.
    pub fn matches(&self, product: &Product) -> bool {
        text_matches(product, &self.text) && self.filters.iter().all(|f| f.matches(product))
    }

    /// Matching products, sorted (stable for equal keys).
    pub fn run(&self, products: &[Product]) -> Vec<Product> {
        let mut results: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        results.sort_by(|a, b| self.sort.compare(a, b));
        results
    }
}
