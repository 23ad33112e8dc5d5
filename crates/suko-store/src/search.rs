//! Catalog search.

use crate::catalog::CatalogStore;
use crate::navigation::{Navigator, Route};
use crate::observable::{Observable, Subscription};
use std::sync::Arc;
use suko_commerce::catalog::Product;
use suko_commerce::search::SearchQuery;

/// Runs text searches against the catalog and publishes the results.
#[derive(Debug, Clone)]
pub struct SearchService {
    catalog: Arc<CatalogStore>,
    navigator: Arc<dyn Navigator>,
    results: Observable<Vec<Product>>,
    last_query: Observable<String>,
}

impl SearchService {
    pub fn new(catalog: Arc<CatalogStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            catalog,
            navigator,
            results: Observable::new(Vec::new()),
            last_query: Observable::new(String::new()),
        }
    }

    /// Case-insensitive substring match on name, description and category.
    /// A blank query yields no results.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let results = match SearchQuery::parse(query) {
            Some(query) => query.run(&self.catalog.all()),
            None => Vec::new(),
        };
        tracing::debug!(query, count = results.len(), "search");
        self.last_query.set(query.trim().to_string());
        self.results.set(results.clone());
        results
    }

    /// Run a prepared query with filters and sorting.
    pub fn run(&self, query: &SearchQuery) -> Vec<Product> {
        let results = query.run(&self.catalog.all());
        self.last_query.set(query.text.clone());
        self.results.set(results.clone());
        results
    }

    pub fn results(&self) -> Vec<Product> {
        self.results.get()
    }

    pub fn last_query(&self) -> String {
        self.last_query.get()
    }

    pub fn subscribe_results(&self) -> Subscription<Vec<Product>> {
        self.results.subscribe()
    }

    /// Go to the search page for `query`.
    pub fn navigate_to_search(&self, query: &str) {
        self.navigator.navigate(Route::search(query.trim()));
    }
}
