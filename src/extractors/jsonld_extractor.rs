//! JSON-LD structured data
//!
//! Reads `<script type="application/ld+json">` blocks. Real pages ship
//! blocks that are not strictly valid JSON, so parsing is a chain of
//! attempts: strict, then a stream of concatenated documents, then a
//! cleanup pass that joins sibling objects into an array.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde_json::{Deserializer, Map, Value};

use crate::page::{compile, Page};
use crate::price::{normalize_amount, ParsedPrice};

static SIBLING_OBJECTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}\s*\{").expect("valid regex"));

/// Parse every JSON-LD block in page order. Unparseable blocks are skipped.
pub fn read_structured_documents(document: &Html) -> Vec<Value> {
    let Some(selector) = compile(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let text = element.text().collect::<String>();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }

            match parse_block(trimmed) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed JSON-LD block");
                    None
                }
            }
        })
        .collect()
}

fn parse_block(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(text)
        .or_else(|strict| parse_concatenated(text).ok_or(strict))
        .or_else(|_| parse_sibling_objects(text))
}

/// `{...}{...}` or `{...}\n{...}` read as a stream of documents.
fn parse_concatenated(text: &str) -> Option<Value> {
    let mut docs = Deserializer::from_str(text)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match docs.len() {
        0 => None,
        1 => docs.pop(),
        _ => Some(Value::Array(docs)),
    }
}

/// Strip comment wrappers and trailing semicolons, then join sibling objects.
fn parse_sibling_objects(text: &str) -> serde_json::Result<Value> {
    let cleaned = text
        .trim()
        .trim_start_matches("<!--")
        .trim_end_matches("-->")
        .trim()
        .trim_end_matches(';')
        .trim();

    let joined = SIBLING_OBJECTS_RE.replace_all(cleaned, "},{");
    if joined.starts_with('[') {
        serde_json::from_str(&joined)
    } else {
        serde_json::from_str(&format!("[{joined}]"))
    }
}

/// Every object in the documents: array items, `@graph` items, and the
/// objects themselves, in page order.
pub fn structured_objects(documents: &[Value]) -> Vec<&Map<String, Value>> {
    let mut objects = Vec::new();
    for doc in documents {
        collect_objects(doc, &mut objects);
    }
    objects
}

fn collect_objects<'a>(value: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_objects(item, out);
            }
        }
        Value::Object(obj) => {
            if let Some(Value::Array(graph)) = obj.get("@graph") {
                for item in graph {
                    collect_objects(item, out);
                }
            }
            out.push(obj);
        }
        _ => {}
    }
}

/// Whether the object's `@type` (string or array) mentions `needle`,
/// case-insensitively.
pub fn has_type(obj: &Map<String, Value>, needle: &str) -> bool {
    let matches = |t: &str| t.to_ascii_lowercase().contains(needle);
    match obj.get("@type") {
        Some(Value::String(t)) => matches(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

/// First resolvable image from structured data, product objects first.
pub fn structured_image(page: &Page) -> Option<String> {
    let objects = structured_objects(page.structured_documents());

    let products = objects.iter().filter(|obj| has_type(obj, "product"));
    products
        .chain(objects.iter())
        .filter_map(|obj| obj.get("image"))
        .flat_map(image_candidates)
        .find_map(|raw| page.resolve_image(raw))
}

/// Raw references held by an `image` value, in order.
fn image_candidates(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().flat_map(image_candidates).collect(),
        Value::Object(obj) => ["url", "contentUrl", "@id"]
            .iter()
            .filter_map(|key| obj.get(*key).and_then(Value::as_str))
            .take(1)
            .collect(),
        _ => Vec::new(),
    }
}

/// First offer price found in structured data.
pub fn structured_price(page: &Page) -> Option<ParsedPrice> {
    let objects = structured_objects(page.structured_documents());

    objects
        .iter()
        .filter_map(|obj| first_of(obj.get("offers")?))
        .find_map(offer_price)
        .or_else(|| {
            objects
                .iter()
                .filter(|obj| has_type(obj, "offer"))
                .find_map(|obj| offer_price(obj))
        })
}

fn first_of(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(obj),
        Value::Array(items) => items.first().and_then(Value::as_object),
        _ => None,
    }
}

fn offer_price(offer: &Map<String, Value>) -> Option<ParsedPrice> {
    direct_price(offer).or_else(|| {
        let spec = first_of(offer.get("priceSpecification")?)?;
        direct_price(spec)
    })
}

fn direct_price(obj: &Map<String, Value>) -> Option<ParsedPrice> {
    let amount = ["price", "lowPrice"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(scalar_text)
        .and_then(|text| normalize_amount(&text))?;

    let currency = obj
        .get("priceCurrency")
        .and_then(scalar_text)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Some(ParsedPrice { amount, currency })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        Page::parse(html, "https://shop.example.com/products/lamp").unwrap()
    }

    fn ld(json: &str) -> String {
        format!(r#"<script type="application/ld+json">{json}</script>"#)
    }

    #[test]
    fn test_offer_price_and_currency() {
        let page = page(&ld(r#"{"offers":{"price":"19.99","priceCurrency":"USD"}}"#));
        let price = structured_price(&page).unwrap();
        assert_eq!(price.amount, "19.99");
        assert_eq!(price.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_numeric_low_price_in_offer_array() {
        let page = page(&ld(
            r#"{"@type":"Product","offers":[{"@type":"AggregateOffer","lowPrice":12.5,"priceCurrency":"EUR"}]}"#,
        ));
        let price = structured_price(&page).unwrap();
        assert_eq!(price.amount, "12.5");
        assert_eq!(price.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_price_specification() {
        let page = page(&ld(
            r#"{"@type":"Product","offers":{"priceSpecification":[{"price":"1,299.00","priceCurrency":"USD"}]}}"#,
        ));
        assert_eq!(structured_price(&page).unwrap().amount, "1299.00");
    }

    #[test]
    fn test_standalone_offer_fallback() {
        let page = page(&ld(
            r#"{"@graph":[{"@type":"WebPage"},{"@type":"Offer","price":"7.00"}]}"#,
        ));
        assert_eq!(structured_price(&page).unwrap().amount, "7.00");
    }

    #[test]
    fn test_concatenated_documents_recovered() {
        let page = page(&ld(
            r#"{"@type":"Organization","name":"Shop"}
               {"@type":"Product","offers":{"price":"5.00"}}"#,
        ));
        assert_eq!(page.structured_documents().len(), 1);
        assert_eq!(structured_price(&page).unwrap().amount, "5.00");
    }

    #[test]
    fn test_comment_wrapped_block_recovered() {
        let page = page(&ld(
            r#"<!-- {"@type":"Product","offers":{"price":"3.50"}}; -->"#,
        ));
        assert_eq!(structured_price(&page).unwrap().amount, "3.50");
    }

    #[test]
    fn test_garbage_block_is_skipped() {
        let html = format!(
            "{}{}",
            ld("{not json at all"),
            ld(r#"{"@type":"Product","image":"/img/lamp.jpg"}"#)
        );
        let page = page(&html);
        assert_eq!(page.structured_documents().len(), 1);
        assert_eq!(
            structured_image(&page).as_deref(),
            Some("https://shop.example.com/img/lamp.jpg")
        );
    }

    #[test]
    fn test_image_shapes() {
        let page = page(&ld(
            r#"[{"@type":"WebSite","image":"https://shop.example.com/logo.png"},
                {"@type":["Product","Thing"],"image":[{"contentUrl":"//cdn.example.com/lamp.jpg"}]}]"#,
        ));
        // product objects are inspected before the rest
        assert_eq!(
            structured_image(&page).as_deref(),
            Some("https://cdn.example.com/lamp.jpg")
        );
    }

    #[test]
    fn test_image_object_with_id() {
        let page = page(&ld(
            r#"{"@type":"Product","image":{"@id":"https://shop.example.com/a.jpg"}}"#,
        ));
        assert_eq!(
            structured_image(&page).as_deref(),
            Some("https://shop.example.com/a.jpg")
        );
    }

    #[test]
    fn test_nothing_found_is_absent() {
        let page = page("<p>plain page</p>");
        assert!(structured_price(&page).is_none());
        assert!(structured_image(&page).is_none());
    }
}
