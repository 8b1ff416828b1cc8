use super::SiteRules;
use crate::extractors::Probe;
use crate::site::SiteFamily;

const TITLE: &[Probe] = &[
    Probe::text("h1[data-buy-box-listing-title]"),
    Probe::text("h1.wt-text-body-01"),
    Probe::text("h1[data-product-title]"),
    Probe::text(".listing-page-title-component h1"),
];

const PRICE: &[Probe] = &[
    Probe::text(r#"p[data-buy-box-region="price"] .wt-text-title-03"#),
    Probe::text(".wt-text-title-03"),
    Probe::text("p.wt-text-title-03"),
    Probe::text(r#"[data-buy-box-region="price"]"#),
];

pub(super) static RULES: SiteRules = SiteRules {
    family: SiteFamily::Etsy,
    title: TITLE,
    price: PRICE,
    default_currency: None,
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
            <h1 data-buy-box-listing-title="true">
                Handmade Ceramic Mug
            </h1>
            <div data-buy-box-region="price">
                <p class="wt-text-title-03">Price: €24,50</p>
            </div>
            <div class="listing-page-image-carousel">
                <img src="https://i.etsystatic.com/123/il_794xN.456.jpg">
            </div>
            "#,
            "https://www.etsy.com/listing/123456/handmade-ceramic-mug",
        )
        .unwrap();

        let draft = extract_site(&page, SiteFamily::Etsy).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Handmade Ceramic Mug"));
        assert_eq!(draft.price.as_deref(), Some("24.50"));
        // symbol is not leading, so no currency is captured
        assert!(draft.currency.is_none());
        assert_eq!(
            draft.image.as_deref(),
            Some("https://i.etsystatic.com/123/il_794xN.456.jpg")
        );
        assert!(draft.asin.is_none());
    }

    #[test]
    fn test_leading_symbol_is_currency() {
        let page = Page::parse(
            r#"<p class="wt-text-title-03">£18.00</p>"#,
            "https://www.etsy.com/uk/listing/9/print",
        )
        .unwrap();

        let draft = extract_site(&page, SiteFamily::Etsy).unwrap();
        assert_eq!(draft.price.as_deref(), Some("18.00"));
        assert_eq!(draft.currency.as_deref(), Some("£"));
    }
}
