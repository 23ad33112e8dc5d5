//! Category display titles.

/// Categories with a fixed display title, in menu order.
pub const CATEGORY_TITLES: [(&str, &str); 12] = [
    ("new-arrivals", "New Arrivals"),
    ("tees", "Tees"),
    ("sweats", "Sweats"),
    ("tops-shirts", "Tops & Shirts"),
    ("knits", "Knits"),
    ("outerwear", "Outerwear"),
    ("denim", "Denim"),
    ("shorts", "Shorts"),
    ("pants", "Pants"),
    ("headwear", "Headwear"),
    ("sunglasses", "Sunglasses"),
    ("accessories", "Accessories"),
];

/// Title shown above a category listing.
///
/// Unknown categories get their first `-` replaced by a space and are
/// uppercased.
pub fn category_title(category: &str) -> String {
    if category.is_empty() || category == "shop" {
        return "All Products".to_string();
    }

    CATEGORY_TITLES
        .iter()
        .find(|(slug, _)| *slug == category)
        .map(|(_, title)| title.to_string())
        .unwrap_or_else(|| category.replacen('-', " ", 1).to_uppercase())
}

/// Check whether `segment` names one of the fixed categories.
pub fn is_known_category(segment: &str) -> bool {
    CATEGORY_TITLES.iter().any(|(slug, _)| *slug == segment)
}
