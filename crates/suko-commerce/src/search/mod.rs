//! Search module.
//!
//! Substring search over the catalog and the filters behind the shop and
//! admin listings.

mod filter;
mod query;

pub use filter::{apply_filters, Filter};
pub use query::{SearchQuery, SortOption};
