use super::SiteRules;
use crate::extractors::Probe;
use crate::site::SiteFamily;

const TITLE: &[Probe] = &[
    Probe::text(r#"h1[itemprop="name"]"#),
    Probe::text("h1.prod-ProductTitle"),
    Probe::text(r#"h1[data-automation="product-title"]"#),
];

// `content` carries the bare amount
const PRICE: &[Probe] = &[
    Probe::attr(r#"span[itemprop="price"]"#, "content"),
    Probe::text(r#"span[itemprop="price"]"#),
    Probe::text(r#"[data-automation="product-price"] span"#),
    Probe::text(r#".price-characteristic[itemprop="price"]"#),
    Probe::text("span.price-group span:not(.ml2)"),
];

pub(super) static RULES: SiteRules = SiteRules {
    family: SiteFamily::Walmart,
    title: TITLE,
    price: PRICE,
    default_currency: Some("$"),
    structured_price_fallback: true,
    price_fallback: None,
    catalog_code: None,
};

#[cfg(test)]
mod tests {
    use crate::page::Page;
    use crate::site::SiteFamily;
    use crate::sites::extract_site;

    #[test]
    fn test_canonical_page() {
        let page = Page::parse(
            r#"
            <h1 itemprop="name">Great Value Olive Oil, 51 fl oz</h1>
            <span itemprop="price">$12.97</span>
            "#,
            "https://www.walmart.com/ip/olive-oil/10450114",
        )
        .unwrap();

        let draft = extract_site(&page, SiteFamily::Walmart).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Great Value Olive Oil, 51 fl oz"));
        assert_eq!(draft.price.as_deref(), Some("12.97"));
        assert_eq!(draft.currency.as_deref(), Some("$"));
    }

    #[test]
    fn test_automation_price_span() {
        let page = Page::parse(
            r#"
            <h1 data-automation="product-title">Desk Fan</h1>
            <div data-automation="product-price"><span>Now</span><span>$24.88</span></div>
            "#,
            "https://www.walmart.com/ip/desk-fan/1",
        )
        .unwrap();

        // the first span has no digits and is skipped
        let draft = extract_site(&page, SiteFamily::Walmart).unwrap();
        assert_eq!(draft.price.as_deref(), Some("24.88"));
    }

    #[test]
    fn test_price_content_attribute_wins() {
        let page = Page::parse(
            r#"
            <h1 itemprop="name">Air Fryer</h1>
            <span itemprop="price" content="59.00">Now $59.00 was $79.00</span>
            "#,
            "https://www.walmart.com/ip/air-fryer/2",
        )
        .unwrap();

        let draft = extract_site(&page, SiteFamily::Walmart).unwrap();
        assert_eq!(draft.price.as_deref(), Some("59.00"));
        assert_eq!(draft.currency.as_deref(), Some("$"));
    }
}
