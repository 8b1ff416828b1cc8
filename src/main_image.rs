//! Main product image
//!
//! A fixed waterfall of image sources, strongest signal first. The first
//! step that yields a resolvable URL wins; later steps are not evaluated.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use serde_json::Value;

use crate::extractors::{meta_image, microdata_image, structured_image};
use crate::page::{compile, inline_style, Page};

static BACKGROUND_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("valid regex")
});

/// Lazy-loading attributes, in the order they are trusted.
const LAZY_ATTRIBUTES: &[&str] = &[
    "data-src",
    "data-lazy-src",
    "data-original",
    "data-zoom-image",
    "data-old-hires",
    "data-large_image",
    "data-srcset",
];

/// Product image elements on the supported storefronts, highest priority first.
const SITE_IMAGE_SELECTORS: &[&str] = &[
    "#landingImage",
    "#imgBlkFront",
    "#main-image",
    ".product-image img",
    ".product__media img",
    ".product-single__photo img",
    r#"[data-testid="product-image"] img"#,
    ".listing-page-image-carousel img",
    "img[data-zoom-image]",
    ".woocommerce-product-gallery__image img",
    ".gallery img",
];

/// Class/id fragments marking a product image container.
const PICTURE_CONTAINER_HINTS: &[&str] = &["product", "gallery", "media", "hero"];

const CONTENT_REGION_SELECTORS: &[&str] =
    &["main", r#"[role="main"]"#, "#main", "#content", "article"];

/// Resolved URLs this short are icons, spacers and tracking pixels.
const MIN_FALLBACK_URL_LEN: usize = 24;

type Step = fn(&Page) -> Option<String>;

const STEPS: &[(&str, Step)] = &[
    ("embedded product data", embedded_image),
    ("structured data", structured_image),
    ("noscript fallback", noscript_image),
    ("meta tags", meta_image),
    ("image_src link", link_image_src),
    ("microdata", microdata_image),
    ("picture element", picture_image),
    ("site image selectors", site_selector_image),
    ("content images", content_image),
];

/// Best guess at the page's main product image, as an absolute URL.
pub fn main_image(page: &Page) -> Option<String> {
    STEPS.iter().find_map(|(name, step)| {
        let url = step(page)?;
        tracing::trace!(step = *name, %url, "main image found");
        Some(url)
    })
}

fn embedded_image(page: &Page) -> Option<String> {
    page.embedded_product()?
        .images
        .iter()
        .find_map(|raw| page.resolve_image(raw))
}

/// `<noscript><img></noscript>` fallbacks. With scripting enabled the
/// parser keeps noscript content as raw text, so it is re-parsed.
fn noscript_image(page: &Page) -> Option<String> {
    let img = compile("img")?;

    page.select_all("noscript").into_iter().find_map(|noscript| {
        let parsed = noscript
            .select(&img)
            .find_map(|el| first_resolved(page, el));

        parsed.or_else(|| {
            let fragment = Html::parse_fragment(&noscript.text().collect::<String>());
            let found = fragment
                .select(&img)
                .find_map(|el| first_resolved(page, el));
            found
        })
    })
}

fn link_image_src(page: &Page) -> Option<String> {
    page.select_all(r#"link[rel="image_src"]"#)
        .into_iter()
        .filter_map(|el| el.value().attr("href"))
        .find_map(|raw| page.resolve_image(raw))
}

fn picture_image(page: &Page) -> Option<String> {
    let (preferred, rest): (Vec<_>, Vec<_>) = page
        .select_all("picture")
        .into_iter()
        .partition(|picture| in_product_container(*picture));

    let source = compile("source[srcset]")?;
    let img = compile("img")?;

    preferred.into_iter().chain(rest).find_map(|picture| {
        picture
            .select(&source)
            .filter_map(|s| s.value().attr("srcset"))
            .find_map(|raw| page.resolve_image(raw))
            .or_else(|| picture.select(&img).find_map(|el| first_resolved(page, el)))
    })
}

/// Page-level classes (`<body class="template-product">`) say nothing about
/// one picture, so the walk stops below `body`.
fn in_product_container(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|ancestor| !matches!(ancestor.value().name(), "body" | "html"))
        .any(|ancestor| {
            let el = ancestor.value();
            let marks = format!(
                "{} {}",
                el.attr("class").unwrap_or_default(),
                el.attr("id").unwrap_or_default()
            )
            .to_ascii_lowercase();
            PICTURE_CONTAINER_HINTS.iter().any(|hint| marks.contains(hint))
        })
}

fn site_selector_image(page: &Page) -> Option<String> {
    SITE_IMAGE_SELECTORS.iter().find_map(|selector| {
        page.select_all(selector)
            .into_iter()
            .find_map(|el| first_resolved(page, el))
    })
}

/// Last resort: the widest visible image in the main content region.
fn content_image(page: &Page) -> Option<String> {
    let region = CONTENT_REGION_SELECTORS
        .iter()
        .find_map(|s| page.select_first(s))
        .or_else(|| page.select_first("body"))?;

    let img = compile("img")?;
    let mut images: Vec<_> = region
        .select(&img)
        .filter(|el| page.is_visible(*el))
        .map(|el| (page.intrinsic_width(el).unwrap_or(0.0), el))
        .collect();

    // Stable, so equal widths keep document order
    images.sort_by(|a, b| b.0.total_cmp(&a.0));

    images
        .into_iter()
        .filter_map(|(_, el)| first_resolved(page, el))
        .find(|url| url.len() > MIN_FALLBACK_URL_LEN)
}

/// First resolvable reference an element carries: `src`, lazy attributes,
/// `srcset`, then an inline background image.
fn first_resolved(page: &Page, element: ElementRef<'_>) -> Option<String> {
    image_candidates(element)
        .into_iter()
        .find_map(|raw| page.resolve_image(&raw))
}

pub(crate) fn image_candidates(element: ElementRef<'_>) -> Vec<String> {
    let el = element.value();
    let mut candidates: Vec<String> = Vec::new();

    candidates.extend(el.attr("src").map(String::from));
    for attr in LAZY_ATTRIBUTES {
        candidates.extend(el.attr(attr).map(String::from));
    }
    candidates.extend(el.attr("data-a-dynamic-image").and_then(widest_dynamic_image));
    candidates.extend(el.attr("srcset").map(String::from));

    for (prop, value) in inline_style(element) {
        if prop == "background-image" || prop == "background" {
            if let Some(caps) = BACKGROUND_URL_RE.captures(&value) {
                candidates.push(caps[1].to_string());
            }
        }
    }

    candidates
}

/// `data-a-dynamic-image` maps URLs to `[width, height]`; take the widest.
fn widest_dynamic_image(raw: &str) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };

    map.iter()
        .map(|(url, dims)| {
            let width = dims.get(0).and_then(Value::as_f64).unwrap_or(0.0);
            (width, url)
        })
        .fold(None, |best: Option<(f64, &String)>, (w, url)| match best {
            Some((bw, _)) if bw >= w => best,
            _ => Some((w, url)),
        })
        .map(|(_, url)| url.clone())
}
