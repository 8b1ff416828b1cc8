//! Per-site extractors
//!
//! Every supported storefront is described by a [`SiteRules`] table. The
//! shared walk is the same for all of them: title probes, price probes, the
//! family's own price fallback, structured data, then the main image.

mod amazon;
mod etsy;
mod macys;
mod printify;
mod shopify;
mod target;
mod walmart;

use url::Url;

use crate::draft::PartialDraft;
use crate::extractors::{first_match, first_text, structured_price, Probe};
use crate::main_image::main_image;
use crate::page::Page;
use crate::price::{parse_price_text, ParsedPrice};
use crate::site::SiteFamily;

pub use amazon::asin_from_url;

/// Extraction table for one site family.
#[derive(Clone, Copy)]
pub struct SiteRules {
    pub family: SiteFamily,
    pub title: &'static [Probe],
    pub price: &'static [Probe],
    /// Currency assumed when the price text carries no symbol.
    pub default_currency: Option<&'static str>,
    /// Fall back to JSON-LD offers when no probe yields a price.
    pub structured_price_fallback: bool,
    pub price_fallback: Option<fn(&Page) -> Option<ParsedPrice>>,
    /// Catalog code read from the page URL (Amazon's ASIN).
    pub catalog_code: Option<fn(&Url) -> Option<String>>,
}

/// Rules for a known family; `None` for [`SiteFamily::Unknown`].
pub fn rules_for(family: SiteFamily) -> Option<&'static SiteRules> {
    match family {
        SiteFamily::Amazon => Some(&amazon::RULES),
        SiteFamily::Etsy => Some(&etsy::RULES),
        SiteFamily::Macys => Some(&macys::RULES),
        SiteFamily::Walmart => Some(&walmart::RULES),
        SiteFamily::Target => Some(&target::RULES),
        SiteFamily::Shopify => Some(&shopify::RULES),
        SiteFamily::Printify => Some(&printify::RULES),
        SiteFamily::Unknown => None,
    }
}

/// Run the family's extractor. Missing elements leave fields absent.
pub fn extract_site(page: &Page, family: SiteFamily) -> Option<PartialDraft> {
    rules_for(family).map(|rules| rules.extract(page))
}

impl SiteRules {
    pub fn label(&self) -> &'static str {
        self.family.label()
    }

    pub fn extract(&self, page: &Page) -> PartialDraft {
        let mut draft = PartialDraft::with_title(first_text(page, self.title));

        let price = first_match(page, self.price, |text| parse_price_text(&text))
            .or_else(|| self.price_fallback.and_then(|fallback| fallback(page)))
            .or_else(|| {
                if self.structured_price_fallback {
                    structured_price(page)
                } else {
                    None
                }
            });

        draft = draft.or(PartialDraft::with_price(price));
        if draft.currency.is_none() {
            draft.currency = self.default_currency.map(String::from);
        }

        draft.image = main_image(page);
        draft.asin = self.catalog_code.and_then(|code| code(page.url()));

        tracing::debug!(
            site = self.label(),
            title = draft.title.is_some(),
            price = draft.price.is_some(),
            image = draft.image.is_some(),
            "site extractor finished"
        );

        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_family_has_rules() {
        for family in [
            SiteFamily::Amazon,
            SiteFamily::Etsy,
            SiteFamily::Macys,
            SiteFamily::Walmart,
            SiteFamily::Target,
            SiteFamily::Shopify,
            SiteFamily::Printify,
        ] {
            let rules = rules_for(family).unwrap();
            assert_eq!(rules.family, family);
            assert!(!rules.title.is_empty());
            assert!(!rules.price.is_empty());
        }
        assert!(rules_for(SiteFamily::Unknown).is_none());
    }

    #[test]
    fn test_structured_price_fallback() {
        let page = Page::parse(
            r#"
            <h1 class="product-name">Rain Boots</h1>
            <script type="application/ld+json">{"@type":"Product","offers":{"price":"59.00","priceCurrency":"USD"}}</script>
            "#,
            "https://www.macys.com/shop/product/rain-boots?ID=1",
        )
        .unwrap();

        let draft = extract_site(&page, SiteFamily::Macys).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Rain Boots"));
        assert_eq!(draft.price.as_deref(), Some("59.00"));
        assert_eq!(draft.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_missing_elements_leave_fields_absent() {
        let page = Page::parse("<p>nothing here</p>", "https://www.etsy.com/listing/1").unwrap();
        let draft = extract_site(&page, SiteFamily::Etsy).unwrap();
        assert_eq!(draft, PartialDraft::default());
    }
}
