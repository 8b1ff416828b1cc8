//! Title/price reconstruction from user-selected text
//!
//! Used for the "create item from selection" path, where the only input is
//! whatever text the user highlighted.

use std::sync::LazyLock;

use regex::Regex;

use crate::draft::{non_empty, SelectionDraft};
use crate::price::strip_to_digits;

static PRICE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[£$€¥₹]\s?\d[\d,.\s]*").expect("valid regex"));

static PART_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s[-–—|]\s").expect("valid regex"));

const MAX_TITLE_CHARS: usize = 120;

/// Split freeform text into a title and a normalized price.
pub fn parse_selection(text: &str) -> SelectionDraft {
    let raw = text.trim();

    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let (title, price) = if lines.len() > 1 {
        classify(&lines)
    } else {
        let parts: Vec<&str> = PART_SEPARATOR_RE
            .split(raw)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() > 1 {
            let (title, price) = classify(&parts);
            (title.or_else(|| Some(parts[0].to_string())), price)
        } else {
            split_inline(raw)
        }
    };

    SelectionDraft {
        raw: raw.to_string(),
        title: non_empty(title),
        price: price.as_deref().and_then(strip_to_digits),
        url: None,
        timestamp: None,
    }
}

/// First segment holding a currency amount is the price; the first one
/// without is the title.
fn classify(segments: &[&str]) -> (Option<String>, Option<String>) {
    let mut title = None;
    let mut price = None;

    for segment in segments {
        match PRICE_SPAN_RE.find(segment) {
            Some(m) if price.is_none() => price = Some(m.as_str().to_string()),
            Some(_) => {}
            None if title.is_none() => title = Some(segment.to_string()),
            None => {}
        }
    }

    (title, price)
}

/// One run of text: cut the amount out and keep what is left as the title.
fn split_inline(raw: &str) -> (Option<String>, Option<String>) {
    match PRICE_SPAN_RE.find(raw) {
        Some(m) => {
            let rest = format!("{}{}", &raw[..m.start()], &raw[m.end()..]);
            let title = rest
                .trim()
                .trim_matches(|c: char| c == '-' || c == ':' || c.is_whitespace())
                .to_string();
            (Some(title), Some(m.as_str().to_string()))
        }
        None => (Some(raw.chars().take(MAX_TITLE_CHARS).collect()), None),
    }
}
