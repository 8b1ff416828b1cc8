use super::SiteRules;
use crate::extractors::Probe;
use crate::site::SiteFamily;

const TITLE: &[Probe] = &[
    Probe::text(r#"h1[data-test="product-title"]"#),
    Probe::text("h1.Heading__StyledHeading"),
    Probe::text(".ProductTitle h1"),
];

const PRICE: &[Probe] = &[
    Probe::text(r#"[data-test="product-price"]"#),
    Probe::text(r#"span[data-test="product-price"] span"#),
    Probe::text(".ProductPrice span"),
];

pub(super) static RULES: SiteRules = SiteRules {
    family: SiteFamily::Target,
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
            <h1 data-test="product-title">Threshold Throw Pillow</h1>
            <span data-test="product-price">$25.00 - $30.00</span>
            <picture><img src="https://target.scene7.com/is/image/Target/GUEST_pillow"></picture>
            "#,
            "https://www.target.com/p/throw-pillow/-/A-12345",
        )
        .unwrap();

        let draft = extract_site(&page, SiteFamily::Target).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Threshold Throw Pillow"));
        assert_eq!(draft.price.as_deref(), Some("25.00"));
        assert_eq!(draft.currency.as_deref(), Some("$"));
        assert_eq!(
            draft.image.as_deref(),
            Some("https://target.scene7.com/is/image/Target/GUEST_pillow")
        );
    }
}
