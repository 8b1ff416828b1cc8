//! Product draft types
//!
//! Every extraction source returns a [`PartialDraft`]; drafts are merged with
//! [`PartialDraft::or`] in source-priority order and sealed into an immutable
//! [`ProductDraft`].

use serde::{Deserialize, Serialize};
use url::Url;

use crate::price::ParsedPrice;

/// The structured result of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub site: String,
    pub url: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    /// Free-form notes; only set for manually entered products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProductDraft {
    /// Seal a merged partial draft.
    pub fn from_partial(partial: PartialDraft, site: &str, url: &str, timestamp: &str) -> Self {
        Self {
            title: partial.title,
            price: partial.price,
            currency: partial.currency,
            image: partial.image,
            site: site.to_string(),
            url: url.to_string(),
            timestamp: timestamp.to_string(),
            asin: partial.asin,
            notes: None,
        }
    }
}

/// Fields contributed by one extraction source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialDraft {
    pub title: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub image: Option<String>,
    pub asin: Option<String>,
}

impl PartialDraft {
    pub fn with_title(title: Option<String>) -> Self {
        Self {
            title: non_empty(title),
            ..Self::default()
        }
    }

    pub fn with_price(price: Option<ParsedPrice>) -> Self {
        match price {
            Some(p) => Self {
                price: non_empty(Some(p.amount)),
                currency: non_empty(p.currency),
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn with_image(image: Option<String>) -> Self {
        Self {
            image: non_empty(image),
            ..Self::default()
        }
    }

    /// First-non-absent-wins merge; `self` has priority over `fallback`.
    pub fn or(self, fallback: PartialDraft) -> PartialDraft {
        PartialDraft {
            title: self.title.or(fallback.title),
            price: self.price.or(fallback.price),
            currency: self.currency.or(fallback.currency),
            image: self.image.or(fallback.image),
            asin: self.asin.or(fallback.asin),
        }
    }
}

/// Title/price pair reconstructed from user-selected text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDraft {
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl SelectionDraft {
    /// Build a manual-entry product from a captured selection.
    ///
    /// The site falls back to the tab's hostname without `www.`, then to
    /// `"Manual Entry"`; the raw selection is kept in the notes.
    pub fn into_product_draft(self, timestamp: &str) -> ProductDraft {
        let site = self
            .url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .and_then(|u| u.host_str().map(host_label))
            .unwrap_or_else(|| "Manual Entry".to_string());

        ProductDraft {
            title: self.title,
            price: self.price,
            currency: None,
            image: None,
            site,
            url: self.url.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(|| timestamp.to_string()),
            asin: None,
            notes: Some(format!("Selection: {}", self.raw)),
        }
    }
}

/// Hostname label for pages outside the known site families.
pub fn host_label(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Trim and drop empty strings so absence is never encoded as `""`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
