//! Error type for the crate boundaries
//!
//! The extraction pipeline itself never fails: a source that finds nothing
//! yields `None`. These errors surface only where input crosses into the
//! crate (FFI requests, page URLs) or leaves it (storage, product API).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid page URL \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported action \"{0}\"")]
    UnsupportedAction(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("product API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("missing setting: {0}")]
    MissingSetting(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
