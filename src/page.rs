//! Page access for the extractors
//!
//! A [`Page`] is a parsed HTML snapshot plus the URL it was captured from.
//! It is the only way extractors read the document: selector queries,
//! text and attribute reads, inline-style visibility and geometry through a
//! pluggable [`Layout`]. Nothing here mutates the document.

use std::cell::OnceCell;

use chrono::{DateTime, SecondsFormat, Utc};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::extractors::{read_embedded_product, read_structured_documents, EmbeddedProduct};
use crate::image_url::normalize_image_url;

/// Geometry that a rendering engine would know and an HTML parser does not.
///
/// Returning `None` means "unknown"; callers then fall back to source order
/// or declared attributes.
pub trait Layout {
    /// Vertical offset of the element's box.
    fn top(&self, element: ElementRef<'_>) -> Option<f64>;

    /// Natural width of an image element, in pixels.
    fn intrinsic_width(&self, element: ElementRef<'_>) -> Option<f64>;
}

/// Layout without a renderer: no measured offsets, widths taken from the
/// markup (`width`, `data-width`, or the widest `srcset` descriptor).
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceOrderLayout;

impl Layout for SourceOrderLayout {
    fn top(&self, _element: ElementRef<'_>) -> Option<f64> {
        None
    }

    fn intrinsic_width(&self, element: ElementRef<'_>) -> Option<f64> {
        let el = element.value();
        el.attr("width")
            .or_else(|| el.attr("data-width"))
            .and_then(|w| w.trim().trim_end_matches("px").parse::<f64>().ok())
            .or_else(|| el.attr("srcset").and_then(widest_srcset_descriptor))
    }
}

/// Largest `NNNw` descriptor in a responsive source list.
fn widest_srcset_descriptor(srcset: &str) -> Option<f64> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().nth(1))
        .filter_map(|d| d.strip_suffix('w'))
        .filter_map(|w| w.parse::<f64>().ok())
        .fold(None, |best, w| Some(best.map_or(w, |b: f64| b.max(w))))
}

/// A parsed page snapshot.
pub struct Page {
    html: Html,
    url: Url,
    captured_at: DateTime<Utc>,
    layout: Box<dyn Layout>,
    // Per-page memos; never shared across pages
    structured: OnceCell<Vec<Value>>,
    embedded: OnceCell<Option<EmbeddedProduct>>,
}

impl Page {
    /// Parse `html` captured from `url`, stamped with the current time.
    pub fn parse(html: &str, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        Ok(Self {
            html: Html::parse_document(html),
            url,
            captured_at: Utc::now(),
            layout: Box::new(SourceOrderLayout),
            structured: OnceCell::new(),
            embedded: OnceCell::new(),
        })
    }

    /// Fix the capture instant (the draft's `timestamp`).
    pub fn with_captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = captured_at;
        self
    }

    /// Install a geometry provider.
    pub fn with_layout(mut self, layout: Box<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }

    pub fn document(&self) -> &Html {
        &self.html
    }

    /// ISO 8601 capture instant, millisecond precision, `Z` suffix.
    pub fn timestamp(&self) -> String {
        self.captured_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// First element matching `selector`, in document order.
    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = compile(selector)?;
        self.html.select(&selector).next()
    }

    /// Every element matching `selector`, in document order.
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match compile(selector) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// `content` of the first `<meta {attr}="{value}">` with non-empty content.
    pub fn meta_content(&self, attr: &str, value: &str) -> Option<String> {
        self.select_all(&format!(r#"meta[{attr}="{value}"]"#))
            .into_iter()
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|c| !c.is_empty())
            .map(String::from)
    }

    /// Resolve a (normalized) reference against the page URL.
    pub fn resolve_url(&self, raw: &str) -> Option<String> {
        let joined = self.url.join(raw.trim()).ok()?;
        match joined.scheme() {
            "http" | "https" => Some(joined.to_string()),
            _ => None,
        }
    }

    /// Normalize a raw image reference and resolve it against the page URL.
    pub fn resolve_image(&self, raw: &str) -> Option<String> {
        normalize_image_url(raw, self.is_secure()).and_then(|url| self.resolve_url(&url))
    }

    /// Vertical position: measured offset when the layout knows it,
    /// otherwise the element's index in document order.
    pub fn top(&self, element: ElementRef<'_>) -> Option<f64> {
        self.layout
            .top(element)
            .or_else(|| self.source_index(element).map(|i| i as f64))
    }

    pub fn intrinsic_width(&self, element: ElementRef<'_>) -> Option<f64> {
        self.layout.intrinsic_width(element)
    }

    fn source_index(&self, element: ElementRef<'_>) -> Option<usize> {
        let id = element.id();
        self.html.tree.root().descendants().position(|node| node.id() == id)
    }

    /// False when the element or an ancestor is hidden by the `hidden`
    /// attribute or inline styling, or the element itself has zero size.
    pub fn is_visible(&self, element: ElementRef<'_>) -> bool {
        if declares_zero_size(element) {
            return false;
        }

        let hidden = std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .any(is_hidden);

        !hidden
    }

    /// Parsed JSON-LD documents, in page order.
    pub(crate) fn structured_documents(&self) -> &[Value] {
        self.structured
            .get_or_init(|| read_structured_documents(&self.html))
    }

    /// Site-embedded product data block, if any.
    pub(crate) fn embedded_product(&self) -> Option<&EmbeddedProduct> {
        self.embedded
            .get_or_init(|| read_embedded_product(&self.html))
            .as_ref()
    }
}

/// Compile a selector; an invalid one is logged and matches nothing.
pub(crate) fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::debug!(selector, error = %e, "skipping invalid selector");
            None
        }
    }
}

/// Trimmed text content with whitespace runs collapsed; `None` when empty.
pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parsed `style` attribute as lowercase `(property, value)` pairs.
pub(crate) fn inline_style(element: ElementRef<'_>) -> Vec<(String, String)> {
    element
        .value()
        .attr("style")
        .map(|style| {
            style
                .split(';')
                .filter_map(|decl| decl.split_once(':'))
                .map(|(prop, value)| (prop.trim().to_ascii_lowercase(), value.trim().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    if element.value().attr("hidden").is_some() {
        return true;
    }

    inline_style(element).iter().any(|(prop, value)| {
        let value = value.to_ascii_lowercase();
        let value = value.trim_end_matches("!important").trim();
        match prop.as_str() {
            "display" => value == "none",
            "visibility" => value == "hidden" || value == "collapse",
            "opacity" => value.parse::<f64>().is_ok_and(|o| o <= 0.0),
            _ => false,
        }
    })
}

fn declares_zero_size(element: ElementRef<'_>) -> bool {
    let is_zero = |v: &str| {
        let v = v.trim().trim_end_matches("px").trim();
        v.parse::<f64>().is_ok_and(|n| n == 0.0)
    };

    let el = element.value();
    if el.attr("width").is_some_and(is_zero) || el.attr("height").is_some_and(is_zero) {
        return true;
    }

    inline_style(element)
        .iter()
        .any(|(prop, value)| (prop == "width" || prop == "height") && is_zero(value))
}
