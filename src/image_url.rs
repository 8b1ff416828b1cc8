//! Image URL normalization
//!
//! Raw image references come from `src`, `srcset`, lazy-load attributes and
//! structured data. They are reduced to a single absolute-ready URL here;
//! relative references are resolved against the page URL by the caller.

const SIZE_PLACEHOLDERS: &[&str] = &[
    "{width}",
    "{height}",
    "{w}",
    "{h}",
    "%7Bwidth%7D",
    "%7Bheight%7D",
    "%7Bw%7D",
    "%7Bh%7D",
    "%7bwidth%7d",
    "%7bheight%7d",
    "%7bw%7d",
    "%7bh%7d",
];

/// Width substituted for templated size placeholders.
const PLACEHOLDER_SIZE: &str = "1200";

/// Reduce a raw image reference to one URL.
///
/// Takes the first `srcset` candidate without its descriptor, fills size
/// placeholders, adds `https:` to protocol-relative URLs and upgrades
/// `http:` when the page itself is secure. Returns `None` for empty input
/// and inline `data:` images.
pub fn normalize_image_url(raw: &str, secure_page: bool) -> Option<String> {
    let first = raw.split(',').next().unwrap_or_default().trim();
    let candidate = first.split_whitespace().next()?;

    if candidate
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    {
        return None;
    }

    let mut url = candidate.to_string();
    for placeholder in SIZE_PLACEHOLDERS {
        if url.contains(placeholder) {
            url = url.replace(placeholder, PLACEHOLDER_SIZE);
        }
    }

    if let Some(rest) = url.strip_prefix("//") {
        url = format!("https://{rest}");
    } else if secure_page {
        if let Some(rest) = url.strip_prefix("http://") {
            url = format!("https://{rest}");
        }
    }

    Some(url)
}
