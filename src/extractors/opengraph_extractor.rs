//! Open Graph, Twitter Card and product meta tags
//!
//! Publishers are inconsistent about `property` vs `name`, so every key is
//! looked up under both attributes.

use crate::page::Page;
use crate::price::{normalize_amount, ParsedPrice};

const TITLE_KEYS: &[&str] = &["title", "og:title", "twitter:title"];

// Secure variant first
const IMAGE_KEYS: &[&str] = &[
    "og:image:secure_url",
    "og:image:url",
    "og:image",
    "twitter:image",
    "twitter:image:src",
];

const PRICE_AMOUNT_KEYS: &[&str] = &["product:price:amount", "og:price:amount"];
const PRICE_CURRENCY_KEYS: &[&str] = &["product:price:currency", "og:price:currency"];

/// Content of the first non-empty meta tag keyed `key` by `property` or `name`.
pub fn meta_value(page: &Page, key: &str) -> Option<String> {
    page.meta_content("property", key)
        .or_else(|| page.meta_content("name", key))
}

fn first_meta(page: &Page, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| meta_value(page, key))
}

/// `meta[name=title]`, then `og:title`, then `twitter:title`.
pub fn meta_title(page: &Page) -> Option<String> {
    first_meta(page, TITLE_KEYS)
}

/// Social-card image, resolved against the page.
pub fn meta_image(page: &Page) -> Option<String> {
    IMAGE_KEYS
        .iter()
        .filter_map(|key| meta_value(page, key))
        .find_map(|raw| page.resolve_image(&raw))
}

/// Product price meta tags (`product:price:*`, `og:price:*`).
pub fn meta_price(page: &Page) -> Option<ParsedPrice> {
    let amount = first_meta(page, PRICE_AMOUNT_KEYS).and_then(|a| normalize_amount(&a))?;
    let currency = first_meta(page, PRICE_CURRENCY_KEYS);
    Some(ParsedPrice { amount, currency })
}
