//! Microdata (`itemprop`) reads
//!
//! Only the handful of properties product pages rely on. Values follow the
//! microdata rules: `meta` reads `content`, links read `href`, media read
//! `src`, everything else reads text, with `content` preferred when set.

use scraper::ElementRef;

use crate::page::{element_text, Page};
use crate::price::{normalize_amount, ParsedPrice};

/// Property value of an `itemprop` element.
pub fn itemprop_value(element: ElementRef<'_>) -> Option<String> {
    let el = element.value();
    let attr_value = match el.name() {
        "meta" => el.attr("content"),
        "link" | "a" | "area" => el.attr("href"),
        "img" | "audio" | "video" | "source" => el.attr("src"),
        "data" | "meter" => el.attr("value"),
        "time" => el.attr("datetime"),
        _ => el.attr("content"),
    };

    attr_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| element_text(element))
}

/// First non-empty value among `[itemprop=NAME]` elements.
pub fn itemprop(page: &Page, name: &str) -> Option<String> {
    page.select_all(&format!(r#"[itemprop="{name}"]"#))
        .into_iter()
        .find_map(itemprop_value)
}

/// `itemprop=name`, then `itemprop=headline`.
pub fn microdata_title(page: &Page) -> Option<String> {
    itemprop(page, "name").or_else(|| itemprop(page, "headline"))
}

/// `itemprop=price` with `itemprop=priceCurrency`.
pub fn microdata_price(page: &Page) -> Option<ParsedPrice> {
    let amount = page
        .select_all(r#"[itemprop="price"]"#)
        .into_iter()
        .filter_map(itemprop_value)
        .find_map(|raw| normalize_amount(&raw))?;

    Some(ParsedPrice {
        amount,
        currency: itemprop(page, "priceCurrency"),
    })
}

/// `itemprop=image` as a resolved URL.
pub fn microdata_image(page: &Page) -> Option<String> {
    page.select_all(r#"[itemprop="image"]"#)
        .into_iter()
        .filter_map(|el| {
            let el = el.value();
            el.attr("content")
                .or_else(|| el.attr("src"))
                .or_else(|| el.attr("href"))
        })
        .find_map(|raw| page.resolve_image(raw))
}
