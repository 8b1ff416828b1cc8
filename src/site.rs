//! Site family detection
//!
//! Hostname fragments are tested in a fixed order; the first match wins.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteFamily {
    Amazon,
    Etsy,
    Macys,
    Walmart,
    Target,
    Shopify,
    Printify,
    Unknown,
}

/// Hostname fragments, in priority order.
const HOST_FRAGMENTS: &[(&str, SiteFamily)] = &[
    ("amazon.", SiteFamily::Amazon),
    ("etsy.", SiteFamily::Etsy),
    ("macys.", SiteFamily::Macys),
    ("walmart.", SiteFamily::Walmart),
    ("target.", SiteFamily::Target),
    ("shopify.", SiteFamily::Shopify),
    ("myshopify.", SiteFamily::Shopify),
    ("printify.", SiteFamily::Printify),
];

impl SiteFamily {
    /// Classify a hostname. Unknown hosts are not an error.
    pub fn identify(host: &str) -> SiteFamily {
        let host = host.to_ascii_lowercase();
        HOST_FRAGMENTS
            .iter()
            .find(|(fragment, _)| host.contains(fragment))
            .map(|(_, family)| *family)
            .unwrap_or(SiteFamily::Unknown)
    }

    /// Classify the host of a page URL.
    pub fn from_url(url: &Url) -> SiteFamily {
        url.host_str()
            .map(SiteFamily::identify)
            .unwrap_or(SiteFamily::Unknown)
    }

    /// Human-readable label stored in `ProductDraft::site`.
    pub fn label(self) -> &'static str {
        match self {
            SiteFamily::Amazon => "Amazon",
            SiteFamily::Etsy => "Etsy",
            SiteFamily::Macys => "Macy's",
            SiteFamily::Walmart => "Walmart",
            SiteFamily::Target => "Target",
            SiteFamily::Shopify => "Shopify Store",
            SiteFamily::Printify => "Printify",
            SiteFamily::Unknown => "Unknown",
        }
    }

    /// Whether `url` looks like a single-product page for this family.
    pub fn is_product_page(self, url: &Url) -> bool {
        let path = url.path();
        match self {
            SiteFamily::Amazon => path.contains("/dp/") || path.contains("/gp/product/"),
            SiteFamily::Etsy => path.contains("/listing/"),
            SiteFamily::Macys => path.contains("/shop/product/"),
            SiteFamily::Walmart => path.contains("/ip/"),
            SiteFamily::Target => path.contains("/p/"),
            SiteFamily::Shopify => path.contains("/products/"),
            SiteFamily::Printify => path.contains("/product/"),
            SiteFamily::Unknown => false,
        }
    }
}
