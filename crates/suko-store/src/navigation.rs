//! Storefront routes and navigation.

use crate::observable::{Observable, Subscription};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use suko_commerce::catalog::{category_title, is_known_category};

/// A storefront location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    /// Product listing, optionally narrowed to one category.
    Shop { category: Option<String> },
    /// Product detail, addressed by id or name slug.
    Product { id_or_slug: String },
    Search { query: String },
    Cart,
    Checkout,
    OrderConfirmation,
    Support { section: Option<String> },
    AdminLogin,
    AdminDashboard,
}

impl Route {
    pub fn shop(category: impl Into<String>) -> Self {
        Route::Shop {
            category: Some(category.into()),
        }
    }

    pub fn product(id_or_slug: impl Into<String>) -> Self {
        Route::Product {
            id_or_slug: id_or_slug.into(),
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Route::Search {
            query: query.into(),
        }
    }

    /// URL path, percent-encoding dynamic segments.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Shop { category: None } => "/shop".to_string(),
            Route::Shop {
                category: Some(category),
            } => format!("/shop/{}", urlencoding::encode(category)),
            Route::Product { id_or_slug } => {
                format!("/product/{}", urlencoding::encode(id_or_slug))
            }
            Route::Search { query } => format!("/search?q={}", urlencoding::encode(query)),
            Route::Cart => "/bag".to_string(),
            Route::Checkout => "/checkout".to_string(),
            Route::OrderConfirmation => "/order-success".to_string(),
            Route::Support { section: None } => "/support".to_string(),
            Route::Support {
                section: Some(section),
            } => format!("/support/{}", urlencoding::encode(section)),
            Route::AdminLogin => "/admin/login".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
        }
    }

    /// Parse a URL path with an optional query string.
    ///
    /// Legacy top-level category paths (`/tees`) map to the shop. Unknown
    /// paths parse to [`Route::Home`].
    pub fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let segments: Vec<Cow<'_, str>> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_component)
            .collect();
        let segments: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();

        match segments.as_slice() {
            [] | ["features"] => Route::Home,
            ["shop"] => Route::Shop { category: None },
            ["shop", category] => Route::shop(*category),
            [category] if is_known_category(category) => Route::shop(*category),
            ["product", id_or_slug] => Route::product(*id_or_slug),
            ["search"] => Route::search(query_param(query, "q").unwrap_or_default()),
            ["bag"] | ["cart"] => Route::Cart,
            ["checkout"] => Route::Checkout,
            ["order-success"] => Route::OrderConfirmation,
            ["support"] => Route::Support { section: None },
            ["support", section] => Route::Support {
                section: Some(section.to_string()),
            },
            ["admin", "login"] => Route::AdminLogin,
            ["admin", "dashboard"] => Route::AdminDashboard,
            _ => Route::Home,
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::AdminDashboard)
    }

    /// Heading for listing routes.
    pub fn title(&self) -> Option<String> {
        match self {
            Route::Shop { category } => Some(category_title(category.as_deref().unwrap_or(""))),
            Route::Search { query } => Some(format!("Search results for \"{query}\"")),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then(|| decode_component(&value.replace('+', " ")).into_owned())
    })
}

/// Moves the shopper between routes.
pub trait Navigator: Send + Sync + fmt::Debug {
    fn navigate(&self, route: Route);

    fn current(&self) -> Route;
}

/// In-process navigator that records every visited route.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    current: Observable<Route>,
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes visited so far, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return to the previous route. Returns the route now current.
    pub fn back(&self) -> Route {
        let previous = {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            history.pop();
            history.last().cloned().unwrap_or_default()
        };
        self.current.set(previous.clone());
        previous
    }

    pub fn subscribe(&self) -> Subscription<Route> {
        self.current.subscribe()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = %route, "navigate");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.clone());
        self.current.set(route);
    }

    fn current(&self) -> Route {
        self.current.get()
    }
}
