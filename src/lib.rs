//! Product data extraction for the Price Collector
//!
//! Recovers title, price, currency and main image from an e-commerce page
//! snapshot:
//! - Site-specific selector cascades for Amazon, Etsy, Macy's, Walmart,
//!   Target, Shopify and Printify
//! - A generic extractor for every other site
//! - JSON-LD (with @graph support), OpenGraph/Twitter meta and microdata
//! - Embedded product JSON and JavaScript variables (via swc AST parsing)
//! - Title/price reconstruction from selected text
//!
//! Extraction never fails; fields that cannot be found are absent. The FFI
//! module carries requests and drafts as JSON across the C boundary.

pub mod draft;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod generic;
pub mod image_url;
pub mod main_image;
pub mod page;
pub mod pipeline;
pub mod price;
pub mod remote;
pub mod selection;
pub mod site;
pub mod sites;
pub mod storage;

pub use draft::{PartialDraft, ProductDraft, SelectionDraft};
pub use error::{Error, Result};
pub use ffi::*;
pub use image_url::normalize_image_url;
pub use page::{Layout, Page, SourceOrderLayout};
pub use pipeline::{extract_product, ExtractOptions};
pub use selection::parse_selection;
pub use site::SiteFamily;
