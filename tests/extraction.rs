use chrono::{DateTime, Utc};
use price_collector::generic::{scan_price_candidates, MAX_PRICE_CANDIDATES};
use price_collector::storage::{MemoryStore, ProductCollection};
use price_collector::{
    extract_product, handle_request, normalize_image_url, parse_selection, ExtractOptions, Page,
    ProductDraft,
};

fn page(html: &str, url: &str) -> Page {
    let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    Page::parse(html, url).unwrap().with_captured_at(at)
}

fn extract(html: &str, url: &str) -> ProductDraft {
    extract_product(&page(html, url), &ExtractOptions::default())
}

fn assert_normalized(price: &str) {
    assert!(price.chars().all(|c| c.is_ascii_digit() || c == '.'), "{price}");
    assert!(price.matches('.').count() <= 1, "{price}");
}

#[test]
fn test_every_family_yields_title_and_price() {
    let fixtures = [
        (
            "Amazon",
            "https://www.amazon.com/Kettle/dp/B0KETTLE01",
            r#"<span id="productTitle">Electric Kettle</span>
               <span class="a-price"><span class="a-offscreen">$39.99</span></span>"#,
        ),
        (
            "Etsy",
            "https://www.etsy.com/listing/42/linen-napkins",
            r#"<h1 data-buy-box-listing-title="true">Linen Napkins</h1>
               <p class="wt-text-title-03">$18.00</p>"#,
        ),
        (
            "Macy's",
            "https://www.macys.com/shop/product/scarf?ID=7",
            r#"<h1 class="product-name">Cashmere Scarf</h1>
               <span data-auto="product-price">$79.50</span>"#,
        ),
        (
            "Walmart",
            "https://www.walmart.com/ip/towel/555",
            r#"<h1 itemprop="name">Bath Towel</h1><span itemprop="price">$7.48</span>"#,
        ),
        (
            "Target",
            "https://www.target.com/p/lamp/-/A-1",
            r#"<h1 data-test="product-title">Floor Lamp</h1>
               <div data-test="product-price">$45.00</div>"#,
        ),
        (
            "Shopify Store",
            "https://candles.myshopify.com/products/cedar",
            r#"<h1 class="product__title">Cedar Candle</h1><span class="money">$22.00</span>"#,
        ),
        (
            "Printify",
            "https://printify.com/app/product-details/3",
            r#"<h1 class="product-title">Ceramic Mug 11oz</h1>
               <div class="price-display">$4.99</div>"#,
        ),
    ];

    for (site, url, html) in fixtures {
        let draft = extract(html, url);
        assert_eq!(draft.site, site);
        assert!(draft.title.is_some(), "{site} title");
        let price = draft.price.as_deref().unwrap_or_else(|| panic!("{site} price"));
        assert_normalized(price);
        assert_eq!(draft.url, url);
        assert_eq!(draft.timestamp, "2024-05-01T12:00:00.000Z");
    }
}

#[test]
fn test_structured_offers_on_unknown_site() {
    let draft = extract(
        r#"<script type="application/ld+json">
               {"@type":"Product","name":"Trail Shoe","offers":{"price":"19.99","priceCurrency":"USD"}}
           </script>
           <h1>Trail Shoe</h1>"#,
        "https://shoes.example/trail",
    );
    assert_eq!(draft.site, "shoes.example");
    assert_eq!(draft.price.as_deref(), Some("19.99"));
    assert_eq!(draft.currency.as_deref(), Some("USD"));
}

#[test]
fn test_unknown_site_title_only() {
    let draft = extract(
        "<html><head><title>Garden Shears | Tool Shed</title></head><body></body></html>",
        "https://www.toolshed.example/shears",
    );
    assert_eq!(draft.site, "toolshed.example");
    assert_eq!(draft.title.as_deref(), Some("Garden Shears"));
    assert!(draft.price.is_none());
    assert!(draft.image.is_none());
}

#[test]
fn test_backfill_combines_site_title_and_generic_price() {
    let html = r#"
        <h1 class="product-name">Velvet Pillow</h1>
        <meta property="product:price:amount" content="34.00">
    "#;
    let page = page(html, "https://www.macys.com/shop/product/pillow?ID=3");

    let plain = extract_product(&page, &ExtractOptions::default());
    assert_eq!(plain.title.as_deref(), Some("Velvet Pillow"));
    assert!(plain.price.is_none());

    let filled = extract_product(&page, &ExtractOptions::with_backfill());
    assert_eq!(filled.title.as_deref(), Some("Velvet Pillow"));
    assert_eq!(filled.price.as_deref(), Some("34.00"));
    assert_eq!(filled.site, "Macy's");
}

#[test]
fn test_price_scan_cap() {
    let items: String = (0..120).map(|i| format!("<span>€{i},00</span>")).collect();
    let page = page(&format!("<div>{items}</div>"), "https://shop.example/list");
    let candidates = scan_price_candidates(&page);
    assert_eq!(candidates.len(), MAX_PRICE_CANDIDATES);
    assert!(candidates.iter().all(|c| c.price.currency.as_deref() == Some("€")));
}

#[test]
fn test_image_normalizer_properties() {
    assert_eq!(
        normalize_image_url("a.jpg 100w, b.jpg 300w", true).as_deref(),
        Some("a.jpg")
    );
    assert_eq!(
        normalize_image_url("//cdn.example.com/x.jpg", true).as_deref(),
        Some("https://cdn.example.com/x.jpg")
    );

    for raw in [
        "http://cdn.example.com/a_{width}x.jpg",
        "//cdn.example.com/b.jpg 2x",
        "https://cdn.example.com/c.png",
    ] {
        let once = normalize_image_url(raw, true).unwrap();
        assert_eq!(normalize_image_url(&once, true).as_deref(), Some(once.as_str()));
    }
}

#[test]
fn test_selection_to_stored_product() {
    let mut selection = parse_selection("Widget\n$19.99");
    assert_eq!(selection.title.as_deref(), Some("Widget"));
    assert_eq!(selection.price.as_deref(), Some("19.99"));

    selection.url = Some("https://www.gadgets.example/widget".into());
    let product = selection.into_product_draft("2024-05-01T12:00:00.000Z");
    assert_eq!(product.site, "gadgets.example");

    let mut store = MemoryStore::new();
    let mut products = ProductCollection::new(&mut store);
    products.add(product).unwrap();
    assert_eq!(products.count().unwrap(), 1);
}

#[test]
fn test_request_boundary() {
    let response = handle_request(
        r#"<h1 itemprop="name">Box Fan</h1><span itemprop="price">$19.88</span>"#,
        r#"{"action":"extractPrice","url":"https://www.walmart.com/ip/fan/9","options":{"backfillWithGeneric":true}}"#,
    )
    .unwrap();
    let draft: ProductDraft = serde_json::from_str(&response).unwrap();
    assert_eq!(draft.title.as_deref(), Some("Box Fan"));
    assert_eq!(draft.price.as_deref(), Some("19.88"));

    assert!(handle_request("", r#"{"action":"scrapeAll","url":"https://x.example"}"#).is_err());
}
