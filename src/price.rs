//! Price text parsing
//!
//! Turns scraped price text (`"$1,299.99"`, `"19,99 €"`, `"£5"`) into an
//! amount containing only digits and at most one decimal point, plus the
//! leading currency symbol when one is present.

use std::sync::LazyLock;

use regex::Regex;

/// Currency symbols recognized in visible text.
pub const CURRENCY_SYMBOLS: &[char] = &['£', '$', '€', '¥', '₹'];

static LEADING_SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([£$€¥₹]+)").expect("valid regex"));

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d(?:[\d.,]*\d)?").expect("valid regex"));

/// A currency symbol followed by a number, as found in running text.
pub(crate) static SYMBOL_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([£$€¥₹])\s?(\d(?:[\d.,]*\d)?)").expect("valid regex")
});

/// Amount and optional currency parsed out of one piece of price text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPrice {
    pub amount: String,
    pub currency: Option<String>,
}

/// Parse price text into an amount plus the leading currency symbol.
///
/// Returns `None` when the text holds no digits at all.
pub fn parse_price_text(text: &str) -> Option<ParsedPrice> {
    let amount = normalize_amount(text)?;
    let currency = LEADING_SYMBOL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    Some(ParsedPrice { amount, currency })
}

/// Normalize the first numeric token in `text` to digits and at most one `.`.
///
/// When both `,` and `.` occur the rightmost one is the decimal separator.
/// A lone `,` followed by one or two digits is a decimal comma; every other
/// separator is treated as digit grouping.
pub fn normalize_amount(text: &str) -> Option<String> {
    let token = NUMBER_RE.find(text)?.as_str();

    let last_dot = token.rfind('.');
    let last_comma = token.rfind(',');

    let decimal_at = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(dot), None) => {
            // "1.299.000" is grouping, "12.99" is decimal
            if token.matches('.').count() == 1 {
                Some(dot)
            } else {
                None
            }
        }
        (None, Some(comma)) => {
            let decimals = token.len() - comma - 1;
            if token.matches(',').count() == 1 && (1..=2).contains(&decimals) {
                Some(comma)
            } else {
                None
            }
        }
        (None, None) => None,
    };

    let mut amount = String::with_capacity(token.len());
    for (idx, c) in token.char_indices() {
        if c.is_ascii_digit() {
            amount.push(c);
        } else if Some(idx) == decimal_at {
            amount.push('.');
        }
    }

    if amount.is_empty() {
        None
    } else {
        Some(amount)
    }
}

/// Keep only digits and the first decimal point, the way a price typed or
/// selected by a user is cleaned up.
pub fn strip_to_digits(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut seen_dot = false;
    for c in text.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '.' && !seen_dot {
            out.push('.');
            seen_dot = true;
        }
    }

    let out = out.trim_end_matches('.').to_string();
    if out.chars().any(|c| c.is_ascii_digit()) {
        Some(out)
    } else {
        None
    }
}

/// True when `amount` is non-empty and holds only digits and at most one `.`.
pub fn is_normalized_amount(amount: &str) -> bool {
    !amount.is_empty()
        && amount.chars().all(|c| c.is_ascii_digit() || c == '.')
        && amount.matches('.').count() <= 1
}
