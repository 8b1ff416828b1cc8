use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::SiteRules;
use crate::extractors::Probe;
use crate::page::{element_text, Page};
use crate::price::{is_normalized_amount, ParsedPrice};
use crate::site::SiteFamily;

static ASIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/dp/([A-Z0-9]{10})|/gp/product/([A-Z0-9]{10})").expect("valid regex")
});

const TITLE: &[Probe] = &[
    Probe::text("#productTitle"),
    Probe::text("#title"),
    Probe::text("h1.product-title"),
    Probe::text("span#productTitle"),
    Probe::text(r#"[data-feature-name="title"] h1"#),
];

// `.a-price-whole` alone drops the fraction; it is read by the fallback.
const PRICE: &[Probe] = &[
    Probe::text(".a-price .a-offscreen"),
    Probe::text("#priceblock_ourprice"),
    Probe::text("#priceblock_dealprice"),
    Probe::text("#price_inside_buybox"),
    Probe::text(r#"span.a-price[data-a-size="xl"] .a-offscreen"#),
    Probe::text(r#"span.a-price[data-a-size="l"] .a-offscreen"#),
    Probe::text("#corePrice_feature_div .a-offscreen"),
    Probe::text(".priceToPay .a-offscreen"),
];

pub(super) static RULES: SiteRules = SiteRules {
    family: SiteFamily::Amazon,
    title: TITLE,
    price: PRICE,
    default_currency: None,
    structured_price_fallback: true,
    price_fallback: Some(whole_and_fraction),
    catalog_code: Some(asin_from_url),
};

/// ASIN from a `/dp/` or `/gp/product/` path.
pub fn asin_from_url(url: &Url) -> Option<String> {
    let caps = ASIN_RE.captures(url.as_str())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Price split across `.a-price-whole` and `.a-price-fraction`.
fn whole_and_fraction(page: &Page) -> Option<ParsedPrice> {
    let whole: String = page
        .select_first(".a-price-whole")
        .and_then(element_text)?
        .chars()
        .filter(|c| !matches!(c, ',' | '.') && !c.is_whitespace())
        .collect();

    let fraction = page
        .select_first(".a-price-fraction")
        .and_then(element_text)
        .unwrap_or_else(|| "00".to_string());

    let amount = format!("{whole}.{fraction}");
    if whole.is_empty() || !is_normalized_amount(&amount) {
        return None;
    }

    let currency = page.select_first(".a-price-symbol").and_then(element_text);
    Some(ParsedPrice { amount, currency })
}
