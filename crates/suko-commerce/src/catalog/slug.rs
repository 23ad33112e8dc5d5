//! URL slugs for product names.

/// Lowercase `name`, keep ASCII alphanumerics and collapse every other run
/// of characters into a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Percent-decode a route segment, then slugify it.
///
/// Invalid percent-encoding falls back to the raw input.
pub fn decode_slug(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(decoded) => slugify(&decoded),
        Err(_) => slugify(segment),
    }
}
