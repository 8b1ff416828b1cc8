//! Extraction for pages outside the known site families
//!
//! Nothing is known about the markup, so every field walks from the most
//! explicit publisher signal (meta tags, structured data) down to heuristics
//! over the visible text.

use scraper::ElementRef;

use crate::draft::PartialDraft;
use crate::extractors::{
    meta_price, meta_title, microdata_price, microdata_title, structured_price,
};
use crate::main_image::main_image;
use crate::page::{element_text, Page};
use crate::price::{normalize_amount, ParsedPrice, CURRENCY_SYMBOLS, SYMBOL_AMOUNT_RE};

/// Upper bound on price candidates collected from visible text.
pub const MAX_PRICE_CANDIDATES: usize = 50;

/// Separators between a document title and the site name.
const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", ": ", " – ", " — ", " · ", " • "];

/// Longest container text read as one split price.
const MAX_SPLIT_PRICE_CHARS: usize = 40;

/// Text under these elements is never shown as page content.
const SKIPPED_CONTAINERS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// A currency-prefixed amount found in the visible text.
#[derive(Debug, Clone)]
pub struct PriceCandidate<'a> {
    pub price: ParsedPrice,
    pub element: ElementRef<'a>,
}

pub fn extract_generic(page: &Page) -> PartialDraft {
    let draft = PartialDraft::with_title(generic_title(page))
        .or(PartialDraft::with_price(generic_price(page)))
        .or(PartialDraft::with_image(main_image(page)));

    tracing::debug!(
        title = draft.title.is_some(),
        price = draft.price.is_some(),
        image = draft.image.is_some(),
        "generic extractor finished"
    );

    draft
}

/// Meta tags, microdata, the first `h1`, then the document `<title>`
/// without its site-name suffix.
pub fn generic_title(page: &Page) -> Option<String> {
    meta_title(page)
        .or_else(|| microdata_title(page))
        .or_else(|| page.select_first("h1").and_then(element_text))
        .or_else(|| {
            page.select_first("title")
                .and_then(element_text)
                .map(|title| strip_title_suffix(&title).to_string())
        })
}

/// Drop the segment after the last spaced separator (`"Lamp | Shop"` →
/// `"Lamp"`). The title is kept whole when nothing would remain.
pub fn strip_title_suffix(title: &str) -> &str {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.rfind(sep))
        .max();

    match cut.map(|at| title[..at].trim()) {
        Some(head) if !head.is_empty() => head,
        _ => title.trim(),
    }
}

pub fn generic_price(page: &Page) -> Option<ParsedPrice> {
    structured_price(page)
        .or_else(|| meta_price(page))
        .or_else(|| microdata_price(page))
        .or_else(|| closest_to_title(page, scan_price_candidates(page)))
}

/// Currency-prefixed amounts in visible text, in document order, capped at
/// [`MAX_PRICE_CANDIDATES`]. Amounts split across inline children
/// (`<span>$</span><span>249.00</span>`) are read from their container.
pub fn scan_price_candidates(page: &Page) -> Vec<PriceCandidate<'_>> {
    let mut candidates = Vec::new();

    for node in page.document().tree.root().descendants() {
        let (element, text) = if let Some(text) = node.value().as_text() {
            if !text.contains(CURRENCY_SYMBOLS) {
                continue;
            }
            let Some(element) = node.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            (element, String::from(&**text))
        } else if let Some(element) = ElementRef::wrap(node) {
            let Some(text) = split_price_text(element) else {
                continue;
            };
            (element, text)
        } else {
            continue;
        };

        if in_skipped_container(element) || !page.is_visible(element) {
            continue;
        }

        for caps in SYMBOL_AMOUNT_RE.captures_iter(&text) {
            let Some(amount) = normalize_amount(&caps[2]) else {
                continue;
            };
            candidates.push(PriceCandidate {
                price: ParsedPrice {
                    amount,
                    currency: Some(caps[1].to_string()),
                },
                element,
            });
            if candidates.len() >= MAX_PRICE_CANDIDATES {
                return candidates;
            }
        }
    }

    candidates
}

/// Collapsed text of the innermost short element whose amount only appears
/// once its children's text is joined.
fn split_price_text(element: ElementRef<'_>) -> Option<String> {
    if !element.children().any(|child| child.value().is_element()) {
        return None;
    }

    let text = element_text(element)?;
    if text.chars().count() > MAX_SPLIT_PRICE_CHARS || !SYMBOL_AMOUNT_RE.is_match(&text) {
        return None;
    }

    let in_one_node = element
        .descendants()
        .filter_map(|node| node.value().as_text())
        .any(|t| SYMBOL_AMOUNT_RE.is_match(t));
    let in_child = element
        .children()
        .filter_map(ElementRef::wrap)
        .filter_map(element_text)
        .any(|t| SYMBOL_AMOUNT_RE.is_match(&t));

    (!in_one_node && !in_child).then_some(text)
}

fn in_skipped_container(element: ElementRef<'_>) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| SKIPPED_CONTAINERS.contains(&el.value().name()))
}

/// The candidate vertically closest to the page's title element, or the
/// first one when there is no title element to measure from.
fn closest_to_title(page: &Page, candidates: Vec<PriceCandidate<'_>>) -> Option<ParsedPrice> {
    let anchor = page
        .select_first("h1")
        .or_else(|| page.select_first(r#"[itemprop="name"]"#))
        .and_then(|el| page.top(el));

    let Some(anchor) = anchor else {
        return candidates.into_iter().next().map(|c| c.price);
    };

    candidates
        .into_iter()
        .map(|c| {
            let distance = page
                .top(c.element)
                .map_or(f64::INFINITY, |top| (top - anchor).abs());
            (distance, c.price)
        })
        // min_by keeps the first of equally close candidates
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, price)| price)
}
