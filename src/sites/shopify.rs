use super::SiteRules;
use crate::extractors::Probe;
use crate::site::SiteFamily;

const TITLE: &[Probe] = &[
    Probe::text("h1.product-title"),
    Probe::text("h1.product__title"),
    Probe::text(r#"h1[itemprop="name"]"#),
    Probe::text(".product-single__title"),
    Probe::text("h1.product_name"),
];

const PRICE: &[Probe] = &[
    Probe::text(".product-price"),
    Probe::text(".price"),
    Probe::text("span.money"),
    Probe::text("[data-product-price]"),
    Probe::text(r#"span[itemprop="price"]"#),
    Probe::text(".product__price"),
    Probe::attr(r#"meta[itemprop="price"]"#, "content"),
];

pub(super) static RULES: SiteRules = SiteRules {
    family: SiteFamily::Shopify,
    title: TITLE,
    price: PRICE,
    default_currency: None,
    structured_price_fallback: true,
    price_fallback: None,
    catalog_code: None,
};
