use super::SiteRules;
use crate::extractors::Probe;
use crate::site::SiteFamily;

const TITLE: &[Probe] = &[
    Probe::text("h1.product-title"),
    Probe::text(r#"h1[data-testid="product-title"]"#),
    Probe::text(".product-name h1"),
];

const PRICE: &[Probe] = &[
    Probe::text(".product-price"),
    Probe::text(r#"[data-testid="product-price"]"#),
    Probe::text(".price-display"),
];

pub(super) static RULES: SiteRules = SiteRules {
    family: SiteFamily::Printify,
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
            <h1 data-testid="product-title">Unisex Heavy Cotton Tee</h1>
            <div data-testid="product-price">From USD 8.67</div>
            <div data-testid="product-image"><img src="https://images.printify.com/mockup/tee.png"></div>
            "#,
            "https://printify.com/app/product-details/6",
        )
        .unwrap();

        let draft = extract_site(&page, SiteFamily::Printify).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Unisex Heavy Cotton Tee"));
        assert_eq!(draft.price.as_deref(), Some("8.67"));
        assert_eq!(draft.currency.as_deref(), Some("$"));
        assert_eq!(
            draft.image.as_deref(),
            Some("https://images.printify.com/mockup/tee.png")
        );
    }
}
