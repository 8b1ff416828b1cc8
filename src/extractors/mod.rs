//! Page data sources
//!
//! Each module reads one kind of data a product page may carry: selector
//! cascades over the DOM, JSON-LD, meta tags, microdata and embedded
//! script data.

mod css_extractor;
mod js_extractor;
mod jsonld_extractor;
mod microdata_extractor;
mod opengraph_extractor;

pub use css_extractor::*;
pub use js_extractor::*;
pub use jsonld_extractor::*;
pub use microdata_extractor::*;
pub use opengraph_extractor::*;
