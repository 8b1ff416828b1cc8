//! Extraction entry point
//!
//! Identifies the site family, runs its extractor (or the generic one), and
//! optionally back-fills still-absent fields from the generic extractor.

use serde::{Deserialize, Serialize};

use crate::draft::{host_label, PartialDraft, ProductDraft};
use crate::generic::extract_generic;
use crate::page::Page;
use crate::site::SiteFamily;
use crate::sites::extract_site;

/// Knobs for one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Fill fields a site extractor missed from the generic extractor.
    pub backfill_with_generic: bool,
}

impl ExtractOptions {
    pub fn with_backfill() -> Self {
        Self {
            backfill_with_generic: true,
        }
    }
}

/// Extract a product draft from `page`. Never fails; unfound fields are absent.
pub fn extract_product(page: &Page, options: &ExtractOptions) -> ProductDraft {
    let family = SiteFamily::from_url(page.url());

    let (partial, site) = match extract_site(page, family) {
        Some(site_draft) => {
            let merged = if options.backfill_with_generic && needs_backfill(&site_draft) {
                let generic = extract_generic(page);
                tracing::debug!(
                    site = family.label(),
                    title = site_draft.title.is_none() && generic.title.is_some(),
                    price = site_draft.price.is_none() && generic.price.is_some(),
                    currency = site_draft.currency.is_none() && generic.currency.is_some(),
                    image = site_draft.image.is_none() && generic.image.is_some(),
                    "back-filled from generic extractor"
                );
                site_draft.or(generic)
            } else {
                site_draft
            };
            (merged, family.label().to_string())
        }
        None => (extract_generic(page), generic_site_label(page)),
    };

    tracing::debug!(
        site = %site,
        title = partial.title.is_some(),
        price = partial.price.is_some(),
        "extraction finished"
    );

    ProductDraft::from_partial(partial, &site, page.url().as_str(), &page.timestamp())
}

fn needs_backfill(draft: &PartialDraft) -> bool {
    draft.title.is_none() || draft.price.is_none() || draft.currency.is_none() || draft.image.is_none()
}

/// Hostname without `www.`, or `Unknown` for host-less URLs.
fn generic_site_label(page: &Page) -> String {
    page.host()
        .map(host_label)
        .unwrap_or_else(|| SiteFamily::Unknown.label().to_string())
}
