//! Product catalog types.

mod category;
mod form;
mod product;
mod seed;
mod slug;

pub use category::{category_title, is_known_category, CATEGORY_TITLES};
pub use form::{
    color_hex, parse_list, CatalogStats, ProductForm, AVAILABLE_COLORS, AVAILABLE_SIZES,
    MAX_IMAGE_PREVIEWS,
};
pub use product::{Product, ProductDraft, ProductPatch};
pub use seed::{local_placeholders, placeholder_products, PLACEHOLDER_ID_PREFIX};
pub use slug::{decode_slug, slugify};
