use super::SiteRules;
use crate::extractors::Probe;
use crate::site::SiteFamily;

const TITLE: &[Probe] = &[
    Probe::text("h1.product-name"),
    Probe::text(r#"h1[data-auto="product-name"]"#),
    Probe::text(".product-title h1"),
];

const PRICE: &[Probe] = &[
    Probe::text(".price .price-value"),
    Probe::text(r#"span[data-auto="product-price"]"#),
    Probe::text(".sale-price"),
    Probe::text(".regular-price"),
];

pub(super) static RULES: SiteRules = SiteRules {
    family: SiteFamily::Macys,
    title: TITLE,
    price: PRICE,
    default_currency: Some("$"),
    structured_price_fallback: true,
    price_fallback: None,
    catalog_code: None,
};
